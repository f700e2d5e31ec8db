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

//! Virtual File System (VFS) module for runtime asset location lookups.
//!
//! The [`VirtualFileSystem`] answers "where do the bytes of this asset live?"
//! from the library configuration alone, without touching storage. Assets listed
//! in the raw-asset table live under the raw-assets base; everything else follows
//! the imported layout `library/<first two uuid chars>/<uuid>.json`.

use crate::asset::{AssetLocation, AssetResult, AssetUuid, LocationResolver, RawAssetEntry};
use crate::config::LibraryConfig;
use async_trait::async_trait;
use std::collections::HashMap;

/// The runtime location index of an asset library.
#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    library_base: String,
    raw_assets_base: String,
    raw_assets: HashMap<AssetUuid, RawAssetEntry>,
}

/// Converts a path to URL form and enforces a trailing separator.
fn normalize_base(path: &str) -> String {
    let mut url = path.replace('\\', "/");
    if !url.is_empty() && !url.ends_with('/') {
        url.push('/');
    }
    url
}

impl VirtualFileSystem {
    /// Builds the index from a library configuration.
    pub fn new(config: &LibraryConfig) -> Self {
        Self {
            library_base: normalize_base(&config.library_path),
            raw_assets_base: normalize_base(&config.raw_assets_base),
            raw_assets: config.raw_assets.clone(),
        }
    }

    /// The normalized library base, always ending with `/` unless empty.
    pub fn library_base(&self) -> &str {
        &self.library_base
    }

    /// The directory holding the imported form of `uuid`.
    pub fn imported_dir(&self, uuid: AssetUuid) -> String {
        format!("{}{}", self.library_base, uuid.prefix())
    }

    /// Where the bytes of `uuid` live.
    pub fn asset_info(&self, uuid: AssetUuid) -> AssetLocation {
        match self.raw_assets.get(&uuid) {
            Some(entry) => AssetLocation {
                url: format!("{}{}", self.raw_assets_base, entry.url),
                is_raw: entry.raw,
            },
            None => AssetLocation::asset(format!("{}/{}.json", self.imported_dir(uuid), uuid)),
        }
    }

    /// Parses the identifier back out of a URL inside the library.
    ///
    /// Imported assets are named `<prefix>/<uuid>.<ext>`; raw files sit in a
    /// directory named after their uuid. URLs outside the library yield `None`.
    pub fn uuid_from_url(&self, url: &str) -> Option<AssetUuid> {
        let relative = url.strip_prefix(&self.library_base)?;
        let (dir, file) = relative.rsplit_once('/')?;
        let dir_name = dir.rsplit('/').next().unwrap_or(dir);
        let candidate = if dir_name.len() == 2 {
            file.split('.').next().unwrap_or(file)
        } else {
            dir_name
        };
        AssetUuid::parse(candidate).ok()
    }
}

#[async_trait(?Send)]
impl LocationResolver for VirtualFileSystem {
    async fn lookup(&self, uuid: AssetUuid) -> AssetResult<AssetLocation> {
        Ok(self.asset_info(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRICK: &str = "0e2b8b4f-3c0a-4c59-9d51-3f1b7a0c9d11";
    const SCENE: &str = "a1b2c3d4-0000-4000-8000-000000000000";

    fn create_vfs() -> VirtualFileSystem {
        let mut config = LibraryConfig {
            library_path: "C:\\project\\library".to_string(),
            raw_assets_base: "raw".to_string(),
            ..Default::default()
        };
        config.raw_assets.insert(
            AssetUuid::parse(BRICK).unwrap(),
            RawAssetEntry {
                url: "textures/brick.png".to_string(),
                raw: true,
            },
        );
        VirtualFileSystem::new(&config)
    }

    #[test]
    fn test_paths_are_normalized() {
        let vfs = create_vfs();
        assert_eq!(vfs.library_base(), "C:/project/library/");
    }

    #[test]
    fn test_imported_asset_location() {
        let vfs = create_vfs();
        let uuid = AssetUuid::parse(SCENE).unwrap();
        assert_eq!(vfs.imported_dir(uuid), "C:/project/library/a1");
        let info = vfs.asset_info(uuid);
        assert_eq!(info.url, format!("C:/project/library/a1/{SCENE}.json"));
        assert!(!info.is_raw);
    }

    #[test]
    fn test_raw_asset_location() {
        let vfs = create_vfs();
        let info = vfs.asset_info(AssetUuid::parse(BRICK).unwrap());
        assert_eq!(info, AssetLocation::raw("raw/textures/brick.png"));
    }

    #[test]
    fn test_uuid_from_url() {
        let vfs = create_vfs();
        let scene = AssetUuid::parse(SCENE).unwrap();
        let imported = format!("C:/project/library/a1/{SCENE}.json");
        assert_eq!(vfs.uuid_from_url(&imported), Some(scene));

        let raw_file = format!("C:/project/library/a1/{SCENE}/image.png");
        assert_eq!(vfs.uuid_from_url(&raw_file), Some(scene));

        assert_eq!(vfs.uuid_from_url("http://elsewhere/a1/x.json"), None);
    }

    #[tokio::test]
    async fn test_lookup_matches_asset_info() {
        let vfs = create_vfs();
        let uuid = AssetUuid::parse(SCENE).unwrap();
        let location = vfs.lookup(uuid).await.unwrap();
        assert_eq!(location, vfs.asset_info(uuid));
    }
}
