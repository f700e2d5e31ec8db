// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shared fixtures for the asset library integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use tessera_agents::AssetLibrary;
use tessera_core::asset::{
    AssetError, AssetLocation, AssetResult, AssetUuid, LocationResolver, PayloadKind, RawLoader,
    RawPayload,
};
use tessera_core::graph::{ClassDef, ClassRegistry};
use tessera_core::lane::{Lane, LaneKind};
use tokio::task::LocalSet;

/// An in-memory asset store acting as both location resolver and raw loader.
///
/// Every lookup and fetch yields once to the scheduler, so loads are genuinely
/// in flight while other requests arrive.
#[derive(Default)]
pub struct MemoryStore {
    locations: RefCell<HashMap<AssetUuid, AssetLocation>>,
    files: RefCell<HashMap<String, RawPayload>>,
    fetch_log: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Stores a serialized asset and returns its URL.
    pub fn insert_asset(&self, uuid: AssetUuid, json: &str) -> String {
        let url = format!("library/{}/{}.json", uuid.prefix(), uuid);
        self.locations
            .borrow_mut()
            .insert(uuid, AssetLocation::asset(url.clone()));
        self.insert_file(&url, RawPayload::Text(json.to_string()));
        url
    }

    /// Registers a location without any payload behind it.
    pub fn insert_dangling(&self, uuid: AssetUuid) {
        let url = format!("library/{}/{}.json", uuid.prefix(), uuid);
        self.locations
            .borrow_mut()
            .insert(uuid, AssetLocation::asset(url));
    }

    /// Registers a raw resource.
    pub fn insert_raw(&self, uuid: AssetUuid, url: &str) {
        self.locations
            .borrow_mut()
            .insert(uuid, AssetLocation::raw(url));
    }

    pub fn insert_file(&self, url: &str, payload: RawPayload) {
        self.files.borrow_mut().insert(url.to_string(), payload);
    }

    /// Number of fetches issued for `url`.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetch_log
            .borrow()
            .iter()
            .filter(|fetched| fetched.as_str() == url)
            .count()
    }

    pub fn total_fetches(&self) -> usize {
        self.fetch_log.borrow().len()
    }
}

#[async_trait(?Send)]
impl LocationResolver for MemoryStore {
    async fn lookup(&self, uuid: AssetUuid) -> AssetResult<AssetLocation> {
        tokio::task::yield_now().await;
        self.locations
            .borrow()
            .get(&uuid)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("Can not get asset url by uuid {uuid}")))
    }
}

impl Lane for MemoryStore {
    fn strategy_name(&self) -> &'static str {
        "MemoryStore"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Asset
    }
}

#[async_trait(?Send)]
impl RawLoader for MemoryStore {
    async fn fetch(&self, location: &str, _kind: PayloadKind) -> AssetResult<RawPayload> {
        self.fetch_log.borrow_mut().push(location.to_string());
        tokio::task::yield_now().await;
        self.files
            .borrow()
            .get(location)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("Nothing stored at {location}")))
    }
}

/// Classes used across the tests.
pub fn create_classes() -> ClassRegistry {
    let mut classes = ClassRegistry::new();
    classes.register(ClassDef::new("Material").asset());
    classes.register(ClassDef::new("Texture").asset());
    classes.register(
        ClassDef::new("TextAsset")
            .asset()
            .with_raw_field("text", PayloadKind::Text),
    );
    classes.register(ClassDef::new("Transform").with_transient("dirty"));
    classes
}

pub fn create_library(store: &Rc<MemoryStore>) -> AssetLibrary {
    tessera_telemetry::logging::init_for_tests();
    AssetLibrary::builder(store.clone(), store.clone())
        .classes(create_classes())
        .build()
        .unwrap()
}

/// Drives `future` on a fresh `LocalSet`, as the library requires.
pub async fn run_local<F: Future>(future: F) -> F::Output {
    LocalSet::new().run_until(future).await
}

/// Lets spawned continuations run for a while.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

/// `{"__uuid__": "..."}`
pub fn reference(uuid: AssetUuid) -> String {
    format!(r#"{{"__uuid__": "{uuid}"}}"#)
}
