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

use super::{ForeignRef, Value};

/// An object owned by a subsystem outside the asset graph (scene nodes, components).
///
/// Without the [`ScopedObject`] capability a foreign object is opaque: the
/// instantiator shares it and never looks inside.
pub trait ForeignObject {
    /// A short type name used in diagnostics.
    fn kind_name(&self) -> &str;

    /// The scoped-cloning capability, if the object supports it.
    fn scoped(&self) -> Option<&dyn ScopedObject> {
        None
    }
}

/// Capability of foreign objects that live in a hierarchy and can be cloned structurally.
pub trait ScopedObject {
    /// Creates an empty counterpart of the same kind; the instantiator fills its fields.
    fn create_clone(&self) -> ForeignRef;

    /// `true` when this object is `scope` itself or lies beneath it.
    fn is_descendant_of(&self, scope: &ForeignRef) -> bool;

    /// Snapshot of the fields that take part in cloning.
    fn serializable_fields(&self) -> Vec<(String, Value)>;

    /// Reads a field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Writes a field.
    fn set_field(&self, name: &str, value: Value);
}
