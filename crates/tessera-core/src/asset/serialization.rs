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

//! The decoding contract: bytes in, a freshly allocated object graph out.

use super::{AssetResult, AssetUuid, PayloadKind, RawPayload};
use crate::graph::{ClassRegistry, ObjectRef, Slot};
use crate::lane::Lane;

/// A reference to another asset discovered while decoding.
///
/// The slot holds [`Value::Unresolved`](crate::graph::Value::Unresolved) until the
/// dependency resolver patches it.
#[derive(Debug, Clone)]
pub struct DependencyRef {
    /// The referenced asset.
    pub uuid: AssetUuid,
    /// Where the resolved value must be written.
    pub slot: Slot,
}

/// Describes a raw payload that supplies the root asset's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayloadDescriptor {
    /// The root field that receives the payload.
    pub field: String,
    /// How the payload should be fetched.
    pub kind: PayloadKind,
    /// File extension (with leading dot) replacing the asset location's extension.
    pub extension: String,
}

/// The result of decoding one payload.
///
/// A new value is produced by every decode call, so concurrent resolutions
/// never share discovery state.
#[derive(Debug)]
pub struct DecodedAsset {
    /// The top-level object.
    pub root: ObjectRef,
    /// References to other assets, in discovery order.
    pub dependencies: Vec<DependencyRef>,
    /// Present when the root's contents come from a sibling raw file.
    pub raw_payload: Option<RawPayloadDescriptor>,
    /// Slots that reference foreign objects and must be relinked after instantiation.
    pub cross_references: Vec<Slot>,
}

impl DecodedAsset {
    /// Number of completions the resolver must wait for.
    pub fn outstanding(&self) -> usize {
        self.dependencies.len() + usize::from(self.raw_payload.is_some())
    }
}

/// Inputs of a decode call besides the payload itself.
#[derive(Clone, Copy)]
pub struct DecodeOptions<'a> {
    /// Classes known to the library.
    pub classes: &'a ClassRegistry,
    /// An existing object to decode into instead of allocating a new root.
    pub target: Option<&'a ObjectRef>,
    /// Where the payload came from, used for error reporting.
    pub location: &'a str,
}

/// A lane that turns a payload into a [`DecodedAsset`].
pub trait Deserializer: Lane {
    /// Decodes `payload`.
    ///
    /// # Errors
    /// [`AssetError::DecodeFailure`](super::AssetError::DecodeFailure) when the payload
    /// is malformed.
    fn decode(&self, payload: &RawPayload, options: DecodeOptions<'_>) -> AssetResult<DecodedAsset>;
}
