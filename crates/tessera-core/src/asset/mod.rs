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

//! Provides the foundational contracts and primitive types of the asset pipeline.
//!
//! This module is the "common language" shared by every crate that touches assets.
//! It knows nothing about caching or scheduling; it only defines:
//! - [`AssetUuid`], the stable identifier of a logical asset.
//! - [`AssetError`], the closed set of per-request failures.
//! - Where an asset lives ([`AssetLocation`]) and how its bytes are obtained
//!   ([`LocationResolver`], [`RawLoader`]).
//! - How bytes become an object graph ([`Deserializer`], [`DecodedAsset`]).

mod error;
mod location;
mod serialization;
mod source;
mod uuid;

pub use error::*;
pub use location::*;
pub use serialization::*;
pub use source::*;
pub use uuid::*;

use crate::graph::ObjectRef;

/// Completion callback of an identifier-keyed load.
///
/// Invoked exactly once, always from the scheduler and never re-entrantly from
/// the call that registered it.
pub type LoadCallback = Box<dyn FnOnce(AssetResult<ObjectRef>)>;

/// Completion callback of a dependency resolution.
///
/// The boolean reports whether the asset's contents were supplied by a raw
/// payload fetched alongside it.
pub type ResolveCallback = Box<dyn FnOnce(AssetResult<ObjectRef>, bool)>;
