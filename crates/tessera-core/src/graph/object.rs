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

use super::{ClassDef, ObjectRef, Value};
use crate::asset::AssetUuid;
use indexmap::IndexMap;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Prefix of engine-private keys on plain objects; they are never cloned.
pub const PRIVATE_KEY_PREFIX: &str = "__";

/// What kind of object an [`Object`] is.
#[derive(Clone)]
pub enum ObjectKind {
    /// A structureless key/value bag.
    Plain,
    /// An instance of a registered class.
    Class(Rc<ClassDef>),
}

/// A node of the object graph.
///
/// Field storage is interior-mutable so the dependency resolver can patch slots
/// of an already shared graph.
pub struct Object {
    kind: ObjectKind,
    fields: RefCell<IndexMap<String, Value>>,
    uuid: Cell<Option<AssetUuid>>,
    valid: Cell<bool>,
    raw_files: RefCell<Vec<String>>,
}

impl Object {
    /// Allocates an empty object of the given kind.
    pub fn new(kind: ObjectKind) -> ObjectRef {
        Rc::new(Self {
            kind,
            fields: RefCell::new(IndexMap::new()),
            uuid: Cell::new(None),
            valid: Cell::new(true),
            raw_files: RefCell::new(Vec::new()),
        })
    }

    /// Allocates an empty plain object.
    pub fn new_plain() -> ObjectRef {
        Self::new(ObjectKind::Plain)
    }

    /// Allocates an empty instance of `class`.
    pub fn new_instance(class: &Rc<ClassDef>) -> ObjectRef {
        Self::new(ObjectKind::Class(class.clone()))
    }

    /// The object's kind.
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// The class of the object, if it is a class instance.
    pub fn class(&self) -> Option<&Rc<ClassDef>> {
        match &self.kind {
            ObjectKind::Class(class) => Some(class),
            ObjectKind::Plain => None,
        }
    }

    /// The class name, or `"Object"` for plain objects.
    pub fn kind_name(&self) -> &str {
        self.class().map_or("Object", |class| class.name())
    }

    /// `true` when the object's class is an asset class.
    pub fn is_asset(&self) -> bool {
        self.class().is_some_and(|class| class.is_asset())
    }

    /// The asset identifier stamped on a loaded asset.
    pub fn uuid(&self) -> Option<AssetUuid> {
        self.uuid.get()
    }

    /// Stamps the asset identifier.
    pub fn set_uuid(&self, uuid: AssetUuid) {
        self.uuid.set(Some(uuid));
    }

    /// `false` once [`destroy`](Self::destroy) has been called.
    pub fn is_valid(&self) -> bool {
        self.valid.get()
    }

    /// Invalidates the object. Holders keep their handle but observe `is_valid() == false`.
    pub fn destroy(&self) {
        self.valid.set(false);
    }

    /// Returns a copy of the value stored under `name`.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Stores `value` under `name`, keeping the original position of an existing key.
    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }

    /// Removes and returns the value stored under `name`.
    pub fn remove_field(&self, name: &str) -> Option<Value> {
        self.fields.borrow_mut().shift_remove(name)
    }

    /// Removes every field.
    pub fn clear_fields(&self) {
        // Dropping values may drop other objects; release the borrow first.
        let old = std::mem::take(&mut *self.fields.borrow_mut());
        drop(old);
    }

    /// Read access to the field map.
    pub fn fields(&self) -> Ref<'_, IndexMap<String, Value>> {
        self.fields.borrow()
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.borrow().len()
    }

    /// Snapshot of the fields that take part in cloning and serialization.
    ///
    /// Class instances drop their class's transient fields; plain objects drop
    /// keys starting with [`PRIVATE_KEY_PREFIX`].
    pub fn serializable_fields(&self) -> Vec<(String, Value)> {
        let fields = self.fields.borrow();
        fields
            .iter()
            .filter(|(name, _)| match &self.kind {
                ObjectKind::Class(class) => class.is_serializable(name),
                ObjectKind::Plain => !name.starts_with(PRIVATE_KEY_PREFIX),
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Names of the raw files attached to the asset (`_rawFiles`).
    pub fn raw_files(&self) -> Vec<String> {
        self.raw_files.borrow().clone()
    }

    /// `true` when the asset lists raw files that need a post-load step.
    pub fn has_raw_files(&self) -> bool {
        !self.raw_files.borrow().is_empty()
    }

    /// Replaces the raw-file list.
    pub fn set_raw_files(&self, files: Vec<String>) {
        *self.raw_files.borrow_mut() = files;
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.borrow();
        f.debug_struct("Object")
            .field("kind", &self.kind_name())
            .field("uuid", &self.uuid.get())
            .field("valid", &self.valid.get())
            .field("fields", &fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_invalidates_all_holders() {
        let object = Object::new_plain();
        let holder = object.clone();
        object.destroy();
        assert!(!holder.is_valid());
    }

    #[test]
    fn test_plain_serializable_fields_skip_private_keys() {
        let object = Object::new_plain();
        object.set_field("name", "door".into());
        object.set_field("__cache", Value::Bool(true));
        let names: Vec<_> = object
            .serializable_fields()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["name".to_string()]);
    }

    #[test]
    fn test_class_serializable_fields_skip_transients() {
        let class = Rc::new(ClassDef::new("Light").with_transient("runtime_handle"));
        let object = Object::new_instance(&class);
        object.set_field("color", "white".into());
        object.set_field("runtime_handle", Value::Number(7.0));
        object.set_field("__meta", Value::Null);
        let names: Vec<_> = object
            .serializable_fields()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["color".to_string(), "__meta".to_string()]);
    }

    #[test]
    fn test_set_field_keeps_insertion_order() {
        let object = Object::new_plain();
        object.set_field("a", Value::Null);
        object.set_field("b", Value::Null);
        object.set_field("a", Value::Bool(true));
        let keys: Vec<_> = object.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(object.field("a"), Some(Value::Bool(true)));
    }
}
