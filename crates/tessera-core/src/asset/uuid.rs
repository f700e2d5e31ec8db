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

use super::AssetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A globally unique, persistent identifier for a logical asset.
///
/// This UUID names the "idea" of an asset, completely decoupled from where its
/// bytes live. It is the key of every cache tier and of the pending-request
/// registry, so two requests for the same `AssetUuid` always talk about the
/// same asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetUuid(Uuid);

impl AssetUuid {
    /// Creates a new, random (version 4) `AssetUuid`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic (version 5) `AssetUuid` derived from a name.
    ///
    /// Handy for tests and tooling that need stable identifiers for a path.
    pub fn new_v5(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// Wraps an existing [`Uuid`].
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses an identifier from its textual form.
    ///
    /// # Errors
    /// Returns [`AssetError::InvalidArgument`] if `text` is not a UUID.
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        Uuid::parse_str(text)
            .map(Self)
            .map_err(|e| AssetError::InvalidArgument(format!("'{text}' is not an asset uuid: {e}")))
    }

    /// Returns the wrapped [`Uuid`].
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The two-character bucket under which imported assets are stored.
    pub fn prefix(&self) -> String {
        let mut text = self.to_string();
        text.truncate(2);
        text
    }
}

impl Default for AssetUuid {
    /// Creates a new, random (version 4) `AssetUuid`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for AssetUuid {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        let uuid = AssetUuid::new_v5("textures/brick.png");
        let parsed = AssetUuid::parse(&uuid.to_string()).unwrap();
        assert_eq!(parsed, uuid);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = AssetUuid::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, AssetError::InvalidArgument(_)));
    }

    #[test]
    fn test_prefix_is_first_two_characters() {
        let uuid = AssetUuid::parse("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        assert_eq!(uuid.prefix(), "a1");
    }

    #[test]
    fn test_v5_is_deterministic() {
        assert_eq!(AssetUuid::new_v5("a"), AssetUuid::new_v5("a"));
        assert_ne!(AssetUuid::new_v5("a"), AssetUuid::new_v5("b"));
    }
}
