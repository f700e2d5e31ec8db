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

use super::{ForeignObject, Object};
use crate::asset::AssetUuid;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an [`Object`].
pub type ObjectRef = Rc<Object>;

/// Shared handle to a mutable array of values.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to an object owned by a foreign subsystem.
pub type ForeignRef = Rc<dyn ForeignObject>;

/// A dynamically typed field value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// Immutable binary data.
    Bytes(Rc<[u8]>),
    /// A composite or asset object.
    Object(ObjectRef),
    /// An ordered collection.
    Array(ArrayRef),
    /// A handle to a foreign object.
    Foreign(ForeignRef),
    /// A reference to an asset that has not been (or could not be) resolved.
    Unresolved(AssetUuid),
}

impl Value {
    /// Wraps `values` in a fresh shared array.
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the object handle, if any.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the array handle, if any.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the foreign handle, if any.
    pub fn as_foreign(&self) -> Option<&ForeignRef> {
        match self {
            Value::Foreign(foreign) => Some(foreign),
            _ => None,
        }
    }

    /// Returns the string contents, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the number, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Address of the referent for values with reference identity.
    pub fn identity(&self) -> Option<*const ()> {
        match self {
            Value::Object(object) => Some(Rc::as_ptr(object) as *const ()),
            Value::Array(array) => Some(Rc::as_ptr(array) as *const ()),
            Value::Foreign(foreign) => Some(Rc::as_ptr(foreign) as *const ()),
            _ => None,
        }
    }

    /// `true` when both values refer to the very same object, array or foreign handle.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    /// Primitives compare by value, references by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Unresolved(a), Value::Unresolved(b)) => a == b,
            _ => self.same_ref(other),
        }
    }
}

impl fmt::Debug for Value {
    // References print their kind and address only; graphs can be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Bytes(b) => write!(f, "Bytes(len={})", b.len()),
            Value::Object(o) => write!(f, "Object({} @ {:p})", o.kind_name(), Rc::as_ptr(o)),
            Value::Array(a) => write!(f, "Array(len={} @ {:p})", a.borrow().len(), Rc::as_ptr(a)),
            Value::Foreign(x) => {
                write!(f, "Foreign({} @ {:p})", x.kind_name(), Rc::as_ptr(x) as *const ())
            }
            Value::Unresolved(uuid) => write!(f, "Unresolved({uuid})"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<ForeignRef> for Value {
    fn from(value: ForeignRef) -> Self {
        Value::Foreign(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_compare_by_identity() {
        let a = Object::new_plain();
        let b = Object::new_plain();
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_primitives_compare_by_value() {
        assert_eq!(Value::from("x"), Value::String("x".into()));
        assert_eq!(Value::from(1.5), Value::Number(1.5));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_debug_of_cyclic_graph_terminates() {
        let a = Object::new_plain();
        a.set_field("self", Value::Object(a.clone()));
        let text = format!("{:?}", Value::Object(a.clone()));
        assert!(text.starts_with("Object("));
        a.clear_fields();
    }
}
