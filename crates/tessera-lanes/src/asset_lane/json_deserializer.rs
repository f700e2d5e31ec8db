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

//! The reference decoder: a JSON document becomes a [`DecodedAsset`].
//!
//! Format:
//! - The root must be a JSON object.
//! - `"__type__": "Name"` selects a registered class; without it an object is plain.
//! - `{"__uuid__": "<uuid>"}` references another asset. The slot holds
//!   [`Value::Unresolved`] and a dependency is recorded.
//! - `{"__foreign__": "<key>", ...}` is a placeholder for an object owned by a
//!   foreign subsystem; its slot is reported as a cross-reference.
//! - `"_rawFiles": [..]` lists the raw files attached to an asset and
//!   `"_rawext": "png"` names the extension of the raw payload sibling.

use std::cell::RefCell;
use std::rc::Rc;
use tessera_core::asset::{
    AssetError, AssetResult, AssetUuid, DecodeOptions, DecodedAsset, DependencyRef, Deserializer,
    RawPayload, RawPayloadDescriptor,
};
use tessera_core::graph::{
    ClassRegistry, FieldKey, Holder, Object, ObjectKind, ObjectRef, Slot, Value,
};
use tessera_core::lane::{Lane, LaneKind};

/// Key selecting the class of an object.
pub const TYPE_KEY: &str = "__type__";
/// Key of an asset reference.
pub const UUID_KEY: &str = "__uuid__";
/// Key marking a foreign-object placeholder.
pub const FOREIGN_KEY: &str = "__foreign__";
/// Key of the raw-file list.
pub const RAW_FILES_KEY: &str = "_rawFiles";
/// Key of the raw payload extension.
pub const RAW_EXTENSION_KEY: &str = "_rawext";

/// Decodes JSON payloads into object graphs.
#[derive(Debug, Default)]
pub struct JsonDeserializer;

impl JsonDeserializer {
    /// Creates the decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Lane for JsonDeserializer {
    fn strategy_name(&self) -> &'static str {
        "TS_JSON_GRAPH_V1"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Asset
    }
}

impl Deserializer for JsonDeserializer {
    fn decode(
        &self,
        payload: &RawPayload,
        options: DecodeOptions<'_>,
    ) -> AssetResult<DecodedAsset> {
        let json: serde_json::Value = match payload {
            RawPayload::Text(text) => serde_json::from_str(text),
            RawPayload::Bytes(bytes) => serde_json::from_slice(bytes),
        }
        .map_err(|e| AssetError::decode(options.location, e))?;

        let serde_json::Value::Object(map) = json else {
            return Err(AssetError::decode(
                options.location,
                "the root of an asset must be a JSON object",
            ));
        };

        let mut decoder = GraphDecoder {
            classes: options.classes,
            location: options.location,
            dependencies: Vec::new(),
            cross_references: Vec::new(),
        };

        let root = match options.target {
            Some(target) => {
                target.clear_fields();
                decoder.fill_object(target, &map)?;
                target.clone()
            }
            None => decoder.new_object(&map)?,
        };

        let raw_payload = root
            .class()
            .and_then(|class| class.raw_field())
            .map(|raw| RawPayloadDescriptor {
                field: raw.field.clone(),
                kind: raw.kind,
                extension: normalize_extension(root.field(RAW_EXTENSION_KEY).as_ref()),
            });

        Ok(DecodedAsset {
            root,
            dependencies: decoder.dependencies,
            raw_payload,
            cross_references: decoder.cross_references,
        })
    }
}

/// `"png"` and `".png"` both become `".png"`; a missing extension stays empty.
fn normalize_extension(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str) {
        Some("") | None => String::new(),
        Some(ext) if ext.starts_with('.') => ext.to_string(),
        Some(ext) => format!(".{ext}"),
    }
}

/// Discovery state of one decode call.
struct GraphDecoder<'a> {
    classes: &'a ClassRegistry,
    location: &'a str,
    dependencies: Vec<DependencyRef>,
    cross_references: Vec<Slot>,
}

impl GraphDecoder<'_> {
    fn error(&self, reason: impl ToString) -> AssetError {
        AssetError::decode(self.location, reason)
    }

    fn new_object(
        &mut self,
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> AssetResult<ObjectRef> {
        let kind = match map.get(TYPE_KEY) {
            None => ObjectKind::Plain,
            Some(serde_json::Value::String(name)) => ObjectKind::Class(self.classes.resolve(name)),
            Some(other) => {
                return Err(self.error(format!("'{TYPE_KEY}' must be a string, got {other}")))
            }
        };
        let object = Object::new(kind);
        self.fill_object(&object, map)?;
        Ok(object)
    }

    fn fill_object(
        &mut self,
        object: &ObjectRef,
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> AssetResult<()> {
        let holder = Holder::Object(object.clone());
        for (key, json) in map {
            match key.as_str() {
                TYPE_KEY => {}
                RAW_FILES_KEY => object.set_raw_files(self.raw_files(json)?),
                _ => {
                    let value = self.decode_value(json, &holder, FieldKey::Name(key.clone()))?;
                    object.set_field(key.clone(), value);
                }
            }
        }
        Ok(())
    }

    fn raw_files(&self, json: &serde_json::Value) -> AssetResult<Vec<String>> {
        let items = json
            .as_array()
            .ok_or_else(|| self.error(format!("'{RAW_FILES_KEY}' must be an array")))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.error(format!("'{RAW_FILES_KEY}' entries must be strings")))
            })
            .collect()
    }

    fn decode_value(
        &mut self,
        json: &serde_json::Value,
        holder: &Holder,
        key: FieldKey,
    ) -> AssetResult<Value> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                let array = Rc::new(RefCell::new(Vec::with_capacity(items.len())));
                let element_holder = Holder::Array(array.clone());
                for (index, item) in items.iter().enumerate() {
                    let value = self.decode_value(item, &element_holder, FieldKey::Index(index))?;
                    array.borrow_mut().push(value);
                }
                Value::Array(array)
            }
            serde_json::Value::Object(map) => {
                if let Some(reference) = map.get(UUID_KEY) {
                    let text = reference
                        .as_str()
                        .ok_or_else(|| self.error(format!("'{UUID_KEY}' must be a string")))?;
                    let uuid = AssetUuid::parse(text).map_err(|e| self.error(e))?;
                    self.dependencies.push(DependencyRef {
                        uuid,
                        slot: Slot {
                            holder: holder.clone(),
                            key,
                        },
                    });
                    return Ok(Value::Unresolved(uuid));
                }
                let object = self.new_object(map)?;
                if map.contains_key(FOREIGN_KEY) {
                    self.cross_references.push(Slot {
                        holder: holder.clone(),
                        key,
                    });
                }
                Value::Object(object)
            }
        })
    }
}
