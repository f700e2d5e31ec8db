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

use crate::asset::PayloadKind;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A field whose contents are supplied by a raw file stored next to the asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldDef {
    /// Name of the field receiving the payload.
    pub field: String,
    /// How the payload is fetched.
    pub kind: PayloadKind,
}

/// Describes a class of objects the decoder can instantiate.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    is_asset: bool,
    transient: HashSet<String>,
    raw_field: Option<RawFieldDef>,
    placeholder: bool,
}

impl ClassDef {
    /// A non-asset class with no special fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_asset: false,
            transient: HashSet::new(),
            raw_field: None,
            placeholder: false,
        }
    }

    /// Stand-in for a class name the registry does not know.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            placeholder: true,
            ..Self::new(name)
        }
    }

    /// Marks the class as an asset class.
    pub fn asset(mut self) -> Self {
        self.is_asset = true;
        self
    }

    /// Declares a field that is never cloned or serialized.
    pub fn with_transient(mut self, field: impl Into<String>) -> Self {
        self.transient.insert(field.into());
        self
    }

    /// Declares the field that receives the asset's raw payload.
    pub fn with_raw_field(mut self, field: impl Into<String>, kind: PayloadKind) -> Self {
        self.raw_field = Some(RawFieldDef {
            field: field.into(),
            kind,
        });
        self
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` for asset classes.
    pub fn is_asset(&self) -> bool {
        self.is_asset
    }

    /// `true` for the stand-in of an unknown class.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The raw-payload field, if the class declares one.
    pub fn raw_field(&self) -> Option<&RawFieldDef> {
        self.raw_field.as_ref()
    }

    /// `false` for transient fields.
    pub fn is_serializable(&self, field: &str) -> bool {
        !self.transient.contains(field)
    }
}

/// Name-keyed table of the classes known to a library.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Rc<ClassDef>>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class`, replacing any class of the same name, and returns the shared handle.
    pub fn register(&mut self, class: ClassDef) -> Rc<ClassDef> {
        let class = Rc::new(class);
        self.classes.insert(class.name.clone(), class.clone());
        class
    }

    /// Looks up a registered class.
    pub fn get(&self, name: &str) -> Option<Rc<ClassDef>> {
        self.classes.get(name).cloned()
    }

    /// Looks up a class, falling back to a placeholder for unknown names.
    ///
    /// An unknown class never fails a load; the data is kept on a placeholder
    /// instance so it survives a round trip.
    pub fn resolve(&self, name: &str) -> Rc<ClassDef> {
        match self.classes.get(name) {
            Some(class) => class.clone(),
            None => {
                log::warn!("Class '{name}' is not registered; using a placeholder");
                Rc::new(ClassDef::placeholder(name))
            }
        }
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// `true` when no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_class() {
        let mut registry = ClassRegistry::new();
        let texture = registry.register(
            ClassDef::new("Texture")
                .asset()
                .with_raw_field("pixels", PayloadKind::Binary),
        );
        let resolved = registry.resolve("Texture");
        assert!(Rc::ptr_eq(&texture, &resolved));
        assert!(resolved.is_asset());
        assert_eq!(resolved.raw_field().map(|f| f.field.as_str()), Some("pixels"));
    }

    #[test]
    fn test_resolve_unknown_class_yields_placeholder() {
        let registry = ClassRegistry::new();
        let class = registry.resolve("Missing");
        assert!(class.is_placeholder());
        assert!(!class.is_asset());
        assert_eq!(class.name(), "Missing");
    }
}
