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

//! # Tessera Agents
//!
//! The [`AssetLibrary`](asset_agent::AssetLibrary) is the public face of the
//! asset pipeline. It drives the lanes (fetch, decode, clone) and the storage
//! from `tessera-data` to turn an identifier into a fully linked object graph.
//!
//! All continuations run as `tokio::task::spawn_local` tasks, so the library
//! must be used from inside a `tokio::task::LocalSet`.

#![warn(missing_docs)]

pub mod asset_agent;

pub use asset_agent::{AssetLibrary, LoadOptions, PayloadLoadOptions, ReleaseTarget};
