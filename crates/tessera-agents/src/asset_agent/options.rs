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

use tessera_core::asset::AssetUuid;
use tessera_core::graph::ObjectRef;

/// Options of an identifier-keyed load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Consult the shared cache (and merge with in-flight loads).
    pub read_shared: bool,
    /// Record the result in the shared cache.
    pub write_shared: bool,
    /// Decode into this object instead of allocating a new one. Such loads are
    /// never served from a cache and never merged.
    pub existing_target: Option<ObjectRef>,
}

impl LoadOptions {
    /// Bypasses the shared cache for this request and its whole dependency subtree.
    pub fn fresh() -> Self {
        Self {
            read_shared: false,
            write_shared: false,
            existing_target: None,
        }
    }

    /// Reloads into `target`.
    pub fn reload_into(target: ObjectRef) -> Self {
        Self {
            existing_target: Some(target),
            ..Self::default()
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            read_shared: true,
            write_shared: true,
            existing_target: None,
        }
    }
}

/// Options of a payload load.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadLoadOptions {
    /// Neither read nor write the shared cache.
    pub isolate: bool,
    /// Record assets that still need a post-load step.
    pub collect_post_load_assets: bool,
    /// Record foreign cross-reference slots found while decoding.
    pub collect_foreign_remap: bool,
}

/// What to release from the shared cache.
#[derive(Debug, Clone)]
pub enum ReleaseTarget {
    /// The asset cached under this identifier.
    Uuid(AssetUuid),
    /// This asset, by its stamped identifier.
    Asset(ObjectRef),
}

impl From<AssetUuid> for ReleaseTarget {
    fn from(uuid: AssetUuid) -> Self {
        ReleaseTarget::Uuid(uuid)
    }
}

impl From<ObjectRef> for ReleaseTarget {
    fn from(asset: ObjectRef) -> Self {
        ReleaseTarget::Asset(asset)
    }
}

impl From<&ObjectRef> for ReleaseTarget {
    fn from(asset: &ObjectRef) -> Self {
        ReleaseTarget::Asset(asset.clone())
    }
}
