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

//! Per-request loading state: which cache tiers a load uses, and what it collects.

use super::AssetCache;
use indexmap::IndexSet;
use std::cell::RefCell;
use tessera_core::asset::AssetUuid;
use tessera_core::graph::{CrossReferenceRemapper, ObjectRef};

/// State shared by a top-level load and every dependency load it spawns.
///
/// The context decides which cache tiers are consulted and written:
///
/// | read shared | write shared | reads                  | writes              |
/// |-------------|--------------|------------------------|---------------------|
/// | yes         | yes          | shared                 | shared              |
/// | yes         | no           | shared, then isolated  | isolated            |
/// | no          | yes          | isolated               | shared and isolated |
/// | no          | no           | isolated               | isolated            |
///
/// The isolated tier exists unless both flags are set. A reference resolved after
/// an earlier load of the same asset within the request finishes is served from
/// it. Loads that overlap in time both miss it; when the shared tier is not read,
/// merging is off as well, so each of them fetches its own copy.
pub struct LoadingContext {
    read_shared: bool,
    write_shared: bool,
    shared: AssetCache,
    isolated: Option<AssetCache>,
    post_load: Option<RefCell<Vec<ObjectRef>>>,
    preload_urls: RefCell<IndexSet<String>>,
    remapper: Option<CrossReferenceRemapper>,
}

impl LoadingContext {
    /// Creates a context over the library's `shared` cache.
    pub fn new(shared: AssetCache, read_shared: bool, write_shared: bool) -> Self {
        let isolated = (!(read_shared && write_shared)).then(AssetCache::new);
        Self {
            read_shared,
            write_shared,
            shared,
            isolated,
            post_load: None,
            preload_urls: RefCell::new(IndexSet::new()),
            remapper: None,
        }
    }

    /// Enables collection of assets that still need a post-load step.
    pub fn with_post_load_collection(mut self) -> Self {
        self.post_load = Some(RefCell::new(Vec::new()));
        self
    }

    /// Enables collection of foreign cross-reference slots.
    pub fn with_remapper(mut self) -> Self {
        self.remapper = Some(CrossReferenceRemapper::new());
        self
    }

    /// Whether the shared tier is consulted.
    pub fn reads_shared(&self) -> bool {
        self.read_shared
    }

    /// The private tier, when this context has one.
    pub fn isolated_cache(&self) -> Option<&AssetCache> {
        self.isolated.as_ref()
    }

    /// Looks `uuid` up in the tiers this context reads.
    pub fn read_cache(&self, uuid: &AssetUuid) -> Option<ObjectRef> {
        if self.read_shared {
            let hit = self.shared.get(uuid);
            if self.write_shared {
                return hit;
            }
            hit.or_else(|| self.isolated.as_ref().and_then(|cache| cache.get(uuid)))
        } else {
            self.isolated.as_ref().and_then(|cache| cache.get(uuid))
        }
    }

    /// Records a freshly loaded asset in the tiers this context writes.
    ///
    /// When post-load collection is enabled, assets that list raw files and
    /// whose contents were not already supplied by a raw payload are queued.
    pub fn write_cache(&self, uuid: AssetUuid, asset: &ObjectRef, has_raw_payload: bool) {
        if self.write_shared {
            self.shared.insert(uuid, asset.clone());
        }
        if let Some(isolated) = &self.isolated {
            isolated.insert(uuid, asset.clone());
        }
        if let Some(post_load) = &self.post_load {
            if asset.has_raw_files() && !has_raw_payload {
                post_load.borrow_mut().push(asset.clone());
            }
        }
    }

    /// Records a raw-resource URL that must be fetched before the result is used.
    pub fn mark_for_preload(&self, url: impl Into<String>) {
        self.preload_urls.borrow_mut().insert(url.into());
    }

    /// The URLs recorded by [`mark_for_preload`](Self::mark_for_preload), in first-seen order.
    pub fn urls_need_preload(&self) -> Vec<String> {
        self.preload_urls.borrow().iter().cloned().collect()
    }

    /// Assets queued for a post-load step, or `None` when collection is disabled.
    pub fn assets_need_post_load(&self) -> Option<Vec<ObjectRef>> {
        self.post_load.as_ref().map(|list| list.borrow().clone())
    }

    /// The cross-reference collector, when enabled.
    pub fn remapper(&self) -> Option<&CrossReferenceRemapper> {
        self.remapper.as_ref()
    }
}

impl std::fmt::Debug for LoadingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingContext")
            .field("read_shared", &self.read_shared)
            .field("write_shared", &self.write_shared)
            .field("isolated", &self.isolated)
            .field("preload_urls", &self.preload_urls.borrow().len())
            .finish()
    }
}
