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

use serde::{Deserialize, Serialize};

/// Where an asset's bytes live, as reported by a [`LocationResolver`](super::LocationResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLocation {
    /// The URL or path handed to the raw loader.
    pub url: String,
    /// `true` for raw resources (plain files) that are referenced by URL and
    /// never deserialized into an object.
    pub is_raw: bool,
}

impl AssetLocation {
    /// A location holding a serialized asset.
    pub fn asset(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_raw: false,
        }
    }

    /// A location holding a raw resource.
    pub fn raw(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_raw: true,
        }
    }
}

/// An entry of the library's raw-asset table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssetEntry {
    /// Path relative to the raw-assets base.
    pub url: String,
    /// Whether the entry is a raw file rather than a serialized asset.
    #[serde(default)]
    pub raw: bool,
}
