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

//! Deep cloning of object graphs that may contain cycles.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tessera_core::asset::{AssetError, AssetResult};
use tessera_core::graph::{
    CrossReferenceRemapper, FieldKey, ForeignRef, Holder, Object, ObjectRef, ScopedObject, Slot,
    Value,
};
use tessera_core::lane::{Lane, LaneKind};

/// Clones live object graphs.
///
/// Every composite object reachable from the root is copied exactly once, so
/// shared references and cycles keep their topology in the copy. Assets and
/// opaque foreign objects are shared rather than copied. Scoped foreign objects
/// are copied when they lie inside the scope and shared otherwise.
#[derive(Debug, Default)]
pub struct GraphInstantiator;

impl GraphInstantiator {
    /// Creates the instantiator.
    pub fn new() -> Self {
        Self
    }

    /// Clones the graph rooted at `root`.
    ///
    /// `scope` limits which scoped foreign objects are copied; `None` copies all
    /// of them. When a `remapper` is given, every slot of the copy that refers to
    /// a scoped foreign object is registered with it.
    ///
    /// # Errors
    /// [`AssetError::InvalidArgument`] when `root` is not a valid non-asset object
    /// or a scoped foreign object.
    pub fn instantiate(
        &self,
        root: &Value,
        scope: Option<&ForeignRef>,
        remapper: Option<&CrossReferenceRemapper>,
    ) -> AssetResult<Value> {
        let mut session = CloneSession {
            clones: HashMap::new(),
            scope,
            remapper,
        };
        match root {
            Value::Object(object) => {
                if !object.is_valid() {
                    return Err(invalid("The thing you want to instantiate is destroyed"));
                }
                if object.is_asset() {
                    return Err(invalid(format!(
                        "Assets cannot be instantiated generically ({})",
                        object.kind_name()
                    )));
                }
                Ok(Value::Object(session.clone_object(object)))
            }
            Value::Foreign(foreign) => match foreign.scoped() {
                Some(scoped) => Ok(Value::Foreign(session.clone_foreign(foreign, scoped))),
                None => Err(invalid(format!(
                    "Foreign object '{}' does not support instantiation",
                    foreign.kind_name()
                ))),
            },
            Value::Array(_) => Err(invalid("Can not instantiate array")),
            Value::Null => Err(invalid("The thing you want to instantiate is nil")),
            _ => Err(invalid("The thing you want to instantiate must be an object")),
        }
    }
}

fn invalid(message: impl Into<String>) -> AssetError {
    AssetError::InvalidArgument(message.into())
}

impl Lane for GraphInstantiator {
    fn strategy_name(&self) -> &'static str {
        "TS_GRAPH_CLONE"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Scene
    }
}

/// State of one instantiation call. Dropped on return, so nothing leaks into the source graph.
struct CloneSession<'a> {
    /// Source identity to `(source, copy)`. Holding the source keeps its address
    /// from being reused by a value built later in the same session.
    clones: HashMap<*const (), (Value, Value)>,
    scope: Option<&'a ForeignRef>,
    remapper: Option<&'a CrossReferenceRemapper>,
}

impl CloneSession<'_> {
    fn clone_object(&mut self, source: &ObjectRef) -> ObjectRef {
        let copy = Object::new(source.kind().clone());
        // Recorded before populating so that cycles back to `source` resolve to `copy`.
        self.clones.insert(
            Rc::as_ptr(source) as *const (),
            (Value::Object(source.clone()), Value::Object(copy.clone())),
        );

        let owner = Holder::Object(copy.clone());
        for (name, value) in source.serializable_fields() {
            let cloned = self.clone_value(&value, &owner, FieldKey::Name(name.clone()));
            copy.set_field(name, cloned);
        }
        copy
    }

    fn clone_foreign(&mut self, source: &ForeignRef, scoped: &dyn ScopedObject) -> ForeignRef {
        let copy = scoped.create_clone();
        self.clones.insert(
            Rc::as_ptr(source) as *const (),
            (Value::Foreign(source.clone()), Value::Foreign(copy.clone())),
        );

        let owner = Holder::Foreign(copy.clone());
        for (name, value) in scoped.serializable_fields() {
            let cloned = self.clone_value(&value, &owner, FieldKey::Name(name.clone()));
            if let Some(target) = copy.scoped() {
                target.set_field(&name, cloned);
            }
        }
        copy
    }

    fn clone_array(&mut self, source: &Rc<RefCell<Vec<Value>>>) -> Value {
        let copy = Rc::new(RefCell::new(Vec::new()));
        self.clones.insert(
            Rc::as_ptr(source) as *const (),
            (Value::Array(source.clone()), Value::Array(copy.clone())),
        );

        let elements = source.borrow().clone();
        let owner = Holder::Array(copy.clone());
        for (index, element) in elements.iter().enumerate() {
            let cloned = self.clone_value(element, &owner, FieldKey::Index(index));
            copy.borrow_mut().push(cloned);
        }
        Value::Array(copy)
    }

    fn register(&self, owner: &Holder, key: FieldKey) {
        if let Some(remapper) = self.remapper {
            remapper.register(Slot {
                holder: owner.clone(),
                key,
            });
        }
    }

    fn clone_value(&mut self, value: &Value, owner: &Holder, key: FieldKey) -> Value {
        if let Some(identity) = value.identity() {
            if let Some((_, existing)) = self.clones.get(&identity) {
                let existing = existing.clone();
                if matches!(existing, Value::Foreign(_)) {
                    self.register(owner, key);
                }
                return existing;
            }
        }

        match value {
            Value::Object(object) if object.is_asset() => value.clone(),
            Value::Object(object) => Value::Object(self.clone_object(object)),
            Value::Array(array) => self.clone_array(array),
            Value::Foreign(foreign) => {
                let Some(scoped) = foreign.scoped() else {
                    return value.clone();
                };
                if let Some(scope) = self.scope {
                    if !scoped.is_descendant_of(scope) {
                        return value.clone();
                    }
                }
                self.register(owner, key);
                Value::Foreign(self.clone_foreign(foreign, scoped))
            }
            _ => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Weak;
    use tessera_core::graph::{ClassDef, ForeignObject};

    /// A minimal scene node: named, with a parent link and free-form fields.
    struct Node {
        parent: RefCell<Weak<Node>>,
        fields: RefCell<Vec<(String, Value)>>,
    }

    impl Node {
        fn create(parent: Option<&Rc<Node>>) -> Rc<Node> {
            Rc::new(Node {
                parent: RefCell::new(parent.map(Rc::downgrade).unwrap_or_default()),
                fields: RefCell::new(Vec::new()),
            })
        }
    }

    impl ForeignObject for Node {
        fn kind_name(&self) -> &str {
            "Node"
        }

        fn scoped(&self) -> Option<&dyn ScopedObject> {
            Some(self)
        }
    }

    impl ScopedObject for Node {
        fn create_clone(&self) -> ForeignRef {
            Node::create(None)
        }

        fn is_descendant_of(&self, scope: &ForeignRef) -> bool {
            let target = Rc::as_ptr(scope) as *const ();
            if std::ptr::eq(self as *const Node as *const (), target) {
                return true;
            }
            let mut current = self.parent.borrow().upgrade();
            while let Some(node) = current {
                if Rc::as_ptr(&node) as *const () == target {
                    return true;
                }
                current = node.parent.borrow().upgrade();
            }
            false
        }

        fn serializable_fields(&self) -> Vec<(String, Value)> {
            self.fields.borrow().clone()
        }

        fn field(&self, name: &str) -> Option<Value> {
            self.fields
                .borrow()
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        }

        fn set_field(&self, name: &str, value: Value) {
            let mut fields = self.fields.borrow_mut();
            match fields.iter_mut().find(|(key, _)| key == name) {
                Some((_, slot)) => *slot = value,
                None => fields.push((name.to_string(), value)),
            }
        }
    }

    /// A node that builds its field values afresh on every snapshot.
    struct Generated {
        label: &'static str,
    }

    impl ForeignObject for Generated {
        fn kind_name(&self) -> &str {
            "Generated"
        }

        fn scoped(&self) -> Option<&dyn ScopedObject> {
            Some(self)
        }
    }

    impl ScopedObject for Generated {
        fn create_clone(&self) -> ForeignRef {
            Node::create(None)
        }

        fn is_descendant_of(&self, _scope: &ForeignRef) -> bool {
            true
        }

        fn serializable_fields(&self) -> Vec<(String, Value)> {
            let payload = Object::new_plain();
            payload.set_field("n", self.label.into());
            vec![("payload".to_string(), Value::Object(payload))]
        }

        fn field(&self, name: &str) -> Option<Value> {
            self.serializable_fields()
                .into_iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
        }

        fn set_field(&self, _name: &str, _value: Value) {}
    }

    struct Opaque;

    impl ForeignObject for Opaque {
        fn kind_name(&self) -> &str {
            "Opaque"
        }
    }

    fn object_field(value: &Value, name: &str) -> Value {
        value.as_object().unwrap().field(name).unwrap()
    }

    #[test]
    fn test_cycle_topology_is_preserved() {
        // ARRANGE: A -> B -> A
        let a = Object::new_plain();
        let b = Object::new_plain();
        a.set_field("next", Value::Object(b.clone()));
        b.set_field("next", Value::Object(a.clone()));
        a.set_field("label", "a".into());

        // ACT
        let copy = GraphInstantiator::new()
            .instantiate(&Value::Object(a.clone()), None, None)
            .unwrap();

        // ASSERT
        let copy_b = object_field(&copy, "next");
        let back = object_field(&copy_b, "next");
        assert!(back.same_ref(&copy));
        assert!(!copy.same_ref(&Value::Object(a.clone())));
        assert!(!copy_b.same_ref(&Value::Object(b.clone())));
        assert_eq!(object_field(&copy, "label"), Value::from("a"));

        a.clear_fields();
        b.clear_fields();
        copy.as_object().unwrap().clear_fields();
        copy_b.as_object().unwrap().clear_fields();
    }

    #[test]
    fn test_shared_references_stay_shared() {
        let shared = Object::new_plain();
        let root = Object::new_plain();
        root.set_field("left", Value::Object(shared.clone()));
        root.set_field("right", Value::Object(shared.clone()));
        root.set_field("list", Value::array(vec![Value::Object(shared.clone())]));

        let copy = GraphInstantiator::new()
            .instantiate(&Value::Object(root), None, None)
            .unwrap();

        let left = object_field(&copy, "left");
        let right = object_field(&copy, "right");
        let list = object_field(&copy, "list");
        assert!(left.same_ref(&right));
        assert!(list.as_array().unwrap().borrow()[0].same_ref(&left));
        assert!(!left.same_ref(&Value::Object(shared)));
    }

    #[test]
    fn test_assets_and_opaque_foreign_objects_are_shared() {
        let texture_class = Rc::new(ClassDef::new("Texture").asset());
        let texture = Object::new_instance(&texture_class);
        let opaque: ForeignRef = Rc::new(Opaque);
        let root = Object::new_plain();
        root.set_field("texture", Value::Object(texture.clone()));
        root.set_field("handle", Value::Foreign(opaque.clone()));

        let copy = GraphInstantiator::new()
            .instantiate(&Value::Object(root), None, None)
            .unwrap();

        assert!(object_field(&copy, "texture").same_ref(&Value::Object(texture)));
        assert!(object_field(&copy, "handle").same_ref(&Value::Foreign(opaque)));
    }

    #[test]
    fn test_transient_and_private_fields_are_skipped() {
        let class = Rc::new(ClassDef::new("Light").with_transient("cache"));
        let light = Object::new_instance(&class);
        light.set_field("color", "red".into());
        light.set_field("cache", Value::Number(1.0));
        let root = Object::new_plain();
        root.set_field("light", Value::Object(light));
        root.set_field("__id", "x".into());

        let copy = GraphInstantiator::new()
            .instantiate(&Value::Object(root), None, None)
            .unwrap();

        assert!(copy.as_object().unwrap().field("__id").is_none());
        let light_copy = object_field(&copy, "light");
        let light_copy = light_copy.as_object().unwrap();
        assert_eq!(light_copy.kind_name(), "Light");
        assert!(light_copy.field("cache").is_none());
        assert_eq!(light_copy.field("color"), Some(Value::from("red")));
    }

    #[test]
    fn test_scope_controls_foreign_cloning() {
        // ARRANGE: scene root -> { inside (child of root), outside (unrelated) }
        let scope_node = Node::create(None);
        let inside = Node::create(Some(&scope_node));
        let outside = Node::create(None);
        let scope: ForeignRef = scope_node.clone();
        let inside_ref: ForeignRef = inside.clone();
        let outside_ref: ForeignRef = outside.clone();
        inside.set_field("hp", Value::Number(10.0));

        let root = Object::new_plain();
        root.set_field("inside", Value::Foreign(inside_ref.clone()));
        root.set_field("again", Value::Foreign(inside_ref.clone()));
        root.set_field("outside", Value::Foreign(outside_ref.clone()));
        let remapper = CrossReferenceRemapper::new();

        // ACT
        let copy = GraphInstantiator::new()
            .instantiate(&Value::Object(root), Some(&scope), Some(&remapper))
            .unwrap();

        // ASSERT
        let inside_copy = object_field(&copy, "inside");
        assert!(!inside_copy.same_ref(&Value::Foreign(inside_ref)));
        assert!(object_field(&copy, "again").same_ref(&inside_copy));
        assert!(object_field(&copy, "outside").same_ref(&Value::Foreign(outside_ref)));
        let hp = inside_copy.as_foreign().unwrap().scoped().unwrap().field("hp");
        assert_eq!(hp, Some(Value::Number(10.0)));
        // Both owner slots of the cloned node were registered.
        assert_eq!(remapper.len(), 2);
    }

    #[test]
    fn test_scoped_foreign_root() {
        let node = Node::create(None);
        node.set_field("name", "player".into());
        let root: ForeignRef = node.clone();

        let copy = GraphInstantiator::new()
            .instantiate(&Value::Foreign(root.clone()), None, None)
            .unwrap();

        assert!(!copy.same_ref(&Value::Foreign(root)));
        let name = copy.as_foreign().unwrap().scoped().unwrap().field("name");
        assert_eq!(name, Some(Value::from("player")));
    }

    #[test]
    fn test_source_graph_is_not_mutated() {
        let root = Object::new_plain();
        root.set_field("x", Value::Number(1.0));
        let child = Object::new_plain();
        root.set_field("child", Value::Object(child.clone()));

        GraphInstantiator::new()
            .instantiate(&Value::Object(root.clone()), None, None)
            .unwrap();

        assert_eq!(root.field_count(), 2);
        assert_eq!(child.field_count(), 0);
        assert!(root.field("child").unwrap().same_ref(&Value::Object(child)));
    }

    #[test]
    fn test_invalid_roots_are_rejected() {
        let instantiator = GraphInstantiator::new();
        let destroyed = Object::new_plain();
        destroyed.destroy();
        let asset = Object::new_instance(&Rc::new(ClassDef::new("Mesh").asset()));
        let opaque: ForeignRef = Rc::new(Opaque);

        for root in [
            Value::Null,
            Value::Number(3.0),
            Value::from("text"),
            Value::array(vec![]),
            Value::Object(destroyed),
            Value::Object(asset),
            Value::Foreign(opaque),
        ] {
            let err = instantiator.instantiate(&root, None, None).unwrap_err();
            assert!(matches!(err, AssetError::InvalidArgument(_)), "{root:?}");
        }
    }

    #[test]
    fn test_snapshot_values_built_on_demand_get_distinct_clones() {
        // ARRANGE: root -> { a, b }, each snapshotting a freshly built object
        let root_node = Node::create(None);
        let a: ForeignRef = Rc::new(Generated { label: "a" });
        let b: ForeignRef = Rc::new(Generated { label: "b" });
        root_node.set_field("a", Value::Foreign(a));
        root_node.set_field("b", Value::Foreign(b));
        let root: ForeignRef = root_node.clone();

        // ACT
        let copy = GraphInstantiator::new()
            .instantiate(&Value::Foreign(root), None, None)
            .unwrap();

        // ASSERT
        let scoped = copy.as_foreign().unwrap().scoped().unwrap();
        let payload_of = |name: &str| {
            let node = scoped.field(name).unwrap();
            node.as_foreign().unwrap().scoped().unwrap().field("payload").unwrap()
        };
        let payload_a = payload_of("a");
        let payload_b = payload_of("b");
        assert!(!payload_a.same_ref(&payload_b));
        assert_eq!(payload_a.as_object().unwrap().field("n"), Some(Value::from("a")));
        assert_eq!(payload_b.as_object().unwrap().field("n"), Some(Value::from("b")));
    }
}
