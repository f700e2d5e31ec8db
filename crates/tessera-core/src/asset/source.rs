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

//! Collaborator contracts for finding and fetching asset bytes.

use super::{AssetLocation, AssetResult, AssetUuid};
use crate::lane::Lane;
use async_trait::async_trait;

/// The shape of payload a [`RawLoader`] is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// A serialized asset document.
    Json,
    /// A UTF-8 text resource.
    Text,
    /// Arbitrary bytes.
    Binary,
}

/// Bytes fetched from a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Textual content (serialized documents, text resources).
    Text(String),
    /// Binary content.
    Bytes(Vec<u8>),
}

impl RawPayload {
    /// Returns the payload as text if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawPayload::Text(text) => Some(text),
            RawPayload::Bytes(_) => None,
        }
    }
}

/// Maps an identifier to the place its bytes live.
#[async_trait(?Send)]
pub trait LocationResolver {
    /// Looks up the location of `uuid`.
    ///
    /// # Errors
    /// [`AssetError::NotFound`](super::AssetError::NotFound) when the identifier is unknown.
    async fn lookup(&self, uuid: AssetUuid) -> AssetResult<AssetLocation>;
}

/// A lane that fetches raw bytes from a location.
#[async_trait(?Send)]
pub trait RawLoader: Lane {
    /// Fetches the payload stored at `location`.
    async fn fetch(&self, location: &str, kind: PayloadKind) -> AssetResult<RawPayload>;
}
