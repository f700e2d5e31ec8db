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

use super::{ArrayRef, ForeignRef, ObjectRef, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The container a [`Slot`] points into.
#[derive(Clone)]
pub enum Holder {
    /// A field of an object.
    Object(ObjectRef),
    /// An element of an array.
    Array(ArrayRef),
    /// A field of a scoped foreign object.
    Foreign(ForeignRef),
}

/// Addresses a position inside a [`Holder`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// A named field.
    Name(String),
    /// An array index.
    Index(usize),
}

/// A writable location in the graph: a holder plus a key.
#[derive(Clone)]
pub struct Slot {
    /// The container.
    pub holder: Holder,
    /// The position inside it.
    pub key: FieldKey,
}

impl Slot {
    /// The field `name` of `object`.
    pub fn field(object: &ObjectRef, name: impl Into<String>) -> Self {
        Self {
            holder: Holder::Object(object.clone()),
            key: FieldKey::Name(name.into()),
        }
    }

    /// The element `index` of `array`.
    pub fn element(array: &ArrayRef, index: usize) -> Self {
        Self {
            holder: Holder::Array(array.clone()),
            key: FieldKey::Index(index),
        }
    }

    /// Reads the current value.
    pub fn get(&self) -> Option<Value> {
        match (&self.holder, &self.key) {
            (Holder::Object(object), FieldKey::Name(name)) => object.field(name),
            (Holder::Array(array), FieldKey::Index(index)) => array.borrow().get(*index).cloned(),
            (Holder::Foreign(foreign), FieldKey::Name(name)) => {
                foreign.scoped().and_then(|scoped| scoped.field(name))
            }
            _ => None,
        }
    }

    /// Writes `value`. Returns `false` when the slot does not address a valid position.
    pub fn set(&self, value: Value) -> bool {
        match (&self.holder, &self.key) {
            (Holder::Object(object), FieldKey::Name(name)) => {
                object.set_field(name.clone(), value);
                true
            }
            (Holder::Array(array), FieldKey::Index(index)) => {
                match array.borrow_mut().get_mut(*index) {
                    Some(element) => {
                        *element = value;
                        true
                    }
                    None => false,
                }
            }
            (Holder::Foreign(foreign), FieldKey::Name(name)) => match foreign.scoped() {
                Some(scoped) => {
                    scoped.set_field(name, value);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let holder = match &self.holder {
            Holder::Object(object) => format!("Object({})", object.kind_name()),
            Holder::Array(array) => format!("Array(len={})", array.borrow().len()),
            Holder::Foreign(foreign) => format!("Foreign({})", foreign.kind_name()),
        };
        f.debug_struct("Slot")
            .field("holder", &holder)
            .field("key", &self.key)
            .finish()
    }
}

/// Collects slots that reference foreign objects so they can be relinked later.
///
/// Instantiation registers the owner slots of foreign references it meets; a
/// foreign subsystem then rewires them once its own objects exist. Handles are
/// cheap to clone and share the same slot list.
#[derive(Clone, Default)]
pub struct CrossReferenceRemapper {
    slots: Rc<RefCell<Vec<Slot>>>,
}

impl CrossReferenceRemapper {
    /// Creates an empty remapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one slot.
    pub fn register(&self, slot: Slot) {
        self.slots.borrow_mut().push(slot);
    }

    /// Records several slots.
    pub fn extend(&self, slots: impl IntoIterator<Item = Slot>) {
        self.slots.borrow_mut().extend(slots);
    }

    /// Number of recorded slots.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// `true` when no slot was recorded.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Snapshot of the recorded slots.
    pub fn slots(&self) -> Vec<Slot> {
        self.slots.borrow().clone()
    }

    /// Rewrites every recorded slot for which `remap` returns a replacement.
    ///
    /// Returns the number of slots rewritten.
    pub fn relink(&self, mut remap: impl FnMut(&Value) -> Option<Value>) -> usize {
        let mut rewritten = 0;
        for slot in self.slots() {
            let Some(current) = slot.get() else { continue };
            if let Some(replacement) = remap(&current) {
                if slot.set(replacement) {
                    rewritten += 1;
                }
            }
        }
        rewritten
    }
}

impl fmt::Debug for CrossReferenceRemapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossReferenceRemapper")
            .field("slots", &self.len())
            .finish()
    }
}
