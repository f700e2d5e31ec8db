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

//! Defines the error kinds reported by asset resolution and instantiation.

use super::AssetUuid;
use thiserror::Error;

/// An error scoped to a single load or instantiation request.
///
/// None of these is fatal to the process. The type is `Clone` because a single
/// failed fetch is delivered to every request that was merged into it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The caller passed something unusable: a malformed identifier, a nil or
    /// destroyed object, an array, or a foreign handle where an object was expected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw (non-asset) resource was requested through the asset path.
    #[error("Should not load raw file {uuid} as an asset")]
    TypeMismatch {
        /// The identifier that names a raw resource.
        uuid: AssetUuid,
    },

    /// The location lookup or the underlying fetch failed.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The fetched payload could not be deserialized.
    #[error("Failed to decode '{location}': {reason}")]
    DecodeFailure {
        /// Where the payload came from (empty for in-memory payloads).
        location: String,
        /// What the decoder complained about.
        reason: String,
    },

    /// A referenced asset failed to resolve. Logged, never fatal to its parent.
    #[error("Dependency {uuid} failed to resolve: {reason}")]
    DependencyFailure {
        /// The dependency that failed.
        uuid: AssetUuid,
        /// The underlying failure, rendered as text.
        reason: String,
    },
}

impl AssetError {
    /// Convenience constructor for a decode failure.
    pub fn decode(location: impl Into<String>, reason: impl ToString) -> Self {
        AssetError::DecodeFailure {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Shorthand for results produced by the asset pipeline.
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let uuid = AssetUuid::parse("0f000000-0000-4000-8000-000000000001").unwrap();
        let err = AssetError::TypeMismatch { uuid };
        assert_eq!(
            err.to_string(),
            "Should not load raw file 0f000000-0000-4000-8000-000000000001 as an asset"
        );
    }

    #[test]
    fn test_decode_helper() {
        let err = AssetError::decode("0f/asset.json", "unexpected end of input");
        assert_eq!(
            err.to_string(),
            "Failed to decode '0f/asset.json': unexpected end of input"
        );
    }
}
