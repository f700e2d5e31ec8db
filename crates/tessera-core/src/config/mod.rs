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

//! Library configuration, read from RON.

use crate::asset::{AssetUuid, RawAssetEntry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Describes where a library's assets live.
///
/// ```ron
/// (
///     library_path: "library/",
///     raw_assets_base: "raw-assets/",
///     raw_assets: {
///         "0e2b8b4f-3c0a-4c59-9d51-3f1b7a0c9d11": (url: "textures/brick.png", raw: true),
///     },
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Root of the imported (serialized) assets.
    pub library_path: String,
    /// Root of the raw-asset table's URLs.
    #[serde(default)]
    pub raw_assets_base: String,
    /// Assets addressed by explicit URL instead of the imported layout.
    #[serde(default)]
    pub raw_assets: HashMap<AssetUuid, RawAssetEntry>,
}

impl LibraryConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).context("Failed to parse library configuration")
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read library configuration '{}'", path.display()))?;
        Self::from_ron_str(&text)
            .with_context(|| format!("Invalid library configuration '{}'", path.display()))
    }

    /// Serializes the configuration as pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty)
            .context("Failed to serialize library configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"(
        library_path: "library/",
        raw_assets_base: "raw/",
        raw_assets: {
            "0e2b8b4f-3c0a-4c59-9d51-3f1b7a0c9d11": (url: "textures/brick.png", raw: true),
        },
    )"#;

    #[test]
    fn test_from_ron_str() {
        let config = LibraryConfig::from_ron_str(SAMPLE).unwrap();
        assert_eq!(config.library_path, "library/");
        let uuid = AssetUuid::parse("0e2b8b4f-3c0a-4c59-9d51-3f1b7a0c9d11").unwrap();
        let entry = &config.raw_assets[&uuid];
        assert_eq!(entry.url, "textures/brick.png");
        assert!(entry.raw);
    }

    #[test]
    fn test_optional_tables_default_to_empty() {
        let config = LibraryConfig::from_ron_str(r#"(library_path: "lib")"#).unwrap();
        assert!(config.raw_assets.is_empty());
        assert!(config.raw_assets_base.is_empty());
    }

    #[test]
    fn test_load_from_file_round_trip() {
        let config = LibraryConfig::from_ron_str(SAMPLE).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_ron_string().unwrap().as_bytes())
            .unwrap();

        let loaded = LibraryConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = LibraryConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.ron"));
    }
}
