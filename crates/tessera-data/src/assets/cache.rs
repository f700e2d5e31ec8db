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

//! An identifier-keyed store of loaded assets.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tessera_core::asset::AssetUuid;
use tessera_core::graph::ObjectRef;

/// A central, in-memory cache mapping an [`AssetUuid`] to its loaded asset.
///
/// The handle is cheap to clone; clones share the same table. The library keeps
/// one as its shared tier, and loading contexts allocate private ones as their
/// isolated tier.
#[derive(Clone, Default)]
pub struct AssetCache {
    storage: Rc<RefCell<HashMap<AssetUuid, ObjectRef>>>,
}

impl AssetCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the asset stored under `uuid`.
    pub fn get(&self, uuid: &AssetUuid) -> Option<ObjectRef> {
        self.storage.borrow().get(uuid).cloned()
    }

    /// Stores `asset` under `uuid`, replacing any previous entry.
    pub fn insert(&self, uuid: AssetUuid, asset: ObjectRef) {
        self.storage.borrow_mut().insert(uuid, asset);
    }

    /// Removes and returns the entry for `uuid`.
    pub fn remove(&self, uuid: &AssetUuid) -> Option<ObjectRef> {
        self.storage.borrow_mut().remove(uuid)
    }

    /// Checks if an asset with the specified UUID is cached.
    pub fn contains(&self, uuid: &AssetUuid) -> bool {
        self.storage.borrow().contains_key(uuid)
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.storage.borrow().len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.storage.borrow().is_empty()
    }

    /// `true` when both handles share the same table.
    pub fn same_storage(&self, other: &AssetCache) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache").field("len", &self.len()).finish()
    }
}
