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

//! # Tessera Lanes
//!
//! Concrete strategies plugged into the asset library:
//!
//! - [`asset_lane`]: fetching raw payloads from the filesystem and decoding the
//!   reference JSON format into an object graph.
//! - [`scene_lane`]: cycle-safe cloning of live object graphs.

#![warn(missing_docs)]

pub mod asset_lane;
pub mod scene_lane;

pub use asset_lane::{FsRawLoader, JsonDeserializer};
pub use scene_lane::GraphInstantiator;
