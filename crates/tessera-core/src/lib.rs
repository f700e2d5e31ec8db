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

//! # Tessera Core
//!
//! Foundational crate containing the traits, core types, and interface contracts
//! shared by every part of the asset-resolution pipeline.
//!
//! Nothing in this crate performs I/O or holds global state. It defines the
//! "common language" (identifiers, the dynamic object graph, error kinds) and the
//! collaborator contracts that the storage, lane, and agent crates build upon.

#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod graph;
pub mod lane;
pub mod vfs;

pub use asset::{AssetError, AssetResult, AssetUuid};
pub use config::LibraryConfig;
pub use graph::{ObjectRef, Value};
