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

//! Merges concurrent identifier-keyed loads into a single fetch.

use std::cell::RefCell;
use std::collections::HashMap;
use tessera_core::asset::{AssetResult, AssetUuid, LoadCallback};
use tessera_core::graph::ObjectRef;

/// The set of loads currently in flight, each with the callbacks waiting on it.
///
/// There is at most one entry per identifier. The first request for an
/// identifier creates the entry and owns the fetch; later requests only append
/// their callback.
#[derive(Default)]
pub struct PendingRequests {
    entries: RefCell<HashMap<AssetUuid, Vec<LoadCallback>>>,
}

impl PendingRequests {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `uuid`.
    ///
    /// Returns `true` when a new entry was created, meaning the caller must
    /// perform the load, and `false` when the callback joined a load in flight.
    pub fn add(&self, uuid: AssetUuid, callback: LoadCallback) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.get_mut(&uuid) {
            Some(waiters) => {
                waiters.push(callback);
                false
            }
            None => {
                entries.insert(uuid, vec![callback]);
                true
            }
        }
    }

    /// Completes the load of `uuid`: removes its entry, then invokes every
    /// waiter once, in registration order, with a copy of `result`.
    ///
    /// The entry is gone before the first callback runs, so a waiter that
    /// requests `uuid` again starts a fresh load. Returns the number of
    /// callbacks invoked.
    pub fn invoke_and_remove(&self, uuid: &AssetUuid, result: AssetResult<ObjectRef>) -> usize {
        let waiters = self.entries.borrow_mut().remove(uuid).unwrap_or_default();
        let count = waiters.len();
        for waiter in waiters {
            waiter(result.clone());
        }
        count
    }

    /// `true` while a load for `uuid` is in flight.
    pub fn is_pending(&self, uuid: &AssetUuid) -> bool {
        self.entries.borrow().contains_key(uuid)
    }

    /// Number of callbacks waiting on `uuid`.
    pub fn waiter_count(&self, uuid: &AssetUuid) -> usize {
        self.entries.borrow().get(uuid).map_or(0, Vec::len)
    }

    /// Number of loads in flight.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// `true` when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl std::fmt::Debug for PendingRequests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequests")
            .field("in_flight", &self.len())
            .finish()
    }
}
