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

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tessera_core::asset::{AssetError, AssetResult, PayloadKind, RawLoader, RawPayload};
use tessera_core::lane::{Lane, LaneKind};

/// A lane that reads payloads from the local filesystem with `tokio::fs`.
///
/// Locations are resolved relative to a root directory; absolute locations are
/// used as-is.
#[derive(Debug, Clone)]
pub struct FsRawLoader {
    root: PathBuf,
}

impl FsRawLoader {
    /// Creates a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory locations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, location: &str) -> PathBuf {
        self.root.join(location)
    }
}

fn map_io_error(location: &str, error: io::Error) -> AssetError {
    match error.kind() {
        io::ErrorKind::InvalidData => AssetError::decode(location, error),
        _ => AssetError::NotFound(format!("Failed to read '{location}': {error}")),
    }
}

impl Lane for FsRawLoader {
    fn strategy_name(&self) -> &'static str {
        "TS_FS_LOADER"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Asset
    }
}

#[async_trait(?Send)]
impl RawLoader for FsRawLoader {
    async fn fetch(&self, location: &str, kind: PayloadKind) -> AssetResult<RawPayload> {
        let path = self.resolve(location);
        log::trace!("Reading {:?} as {:?}", path, kind);
        match kind {
            PayloadKind::Json | PayloadKind::Text => tokio::fs::read_to_string(&path)
                .await
                .map(RawPayload::Text)
                .map_err(|e| map_io_error(location, e)),
            PayloadKind::Binary => tokio::fs::read(&path)
                .await
                .map(RawPayload::Bytes)
                .map_err(|e| map_io_error(location, e)),
        }
    }
}
