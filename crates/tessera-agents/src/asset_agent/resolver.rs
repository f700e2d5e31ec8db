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

//! Dependency resolution: decode a payload, then patch every reference it holds.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tessera_core::asset::{
    AssetError, AssetUuid, DecodeOptions, DependencyRef, RawPayload, ResolveCallback,
};
use tessera_core::graph::{ObjectRef, Value};
use tessera_data::assets::LoadingContext;
use tessera_telemetry::ScopedMetricTimer;

use super::metrics::bump;
use super::AssetLibrary;

/// Counts the outstanding work of one resolution and fires its completion once.
struct PendingDependencies {
    remaining: Cell<usize>,
    asset: ObjectRef,
    has_raw_payload: bool,
    callback: RefCell<Option<ResolveCallback>>,
}

impl PendingDependencies {
    /// Marks one dependency as done; the last one completes the resolution.
    fn settle(&self) {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left > 0 {
            return;
        }
        let callback = self.callback.borrow_mut().take();
        if let Some(callback) = callback {
            callback(Ok(self.asset.clone()), self.has_raw_payload);
        }
    }
}

/// Replaces the extension of the last path segment of `location`.
fn replace_extension(location: &str, extension: &str) -> String {
    if extension.is_empty() {
        return location.to_string();
    }
    let name_start = location.rfind('/').map_or(0, |i| i + 1);
    let stem_end = location[name_start..]
        .rfind('.')
        .map_or(location.len(), |i| name_start + i);
    format!("{}{}", &location[..stem_end], extension)
}

fn payload_into_value(payload: RawPayload) -> Value {
    match payload {
        RawPayload::Text(text) => Value::String(text),
        RawPayload::Bytes(bytes) => Value::Bytes(bytes.into()),
    }
}

impl AssetLibrary {
    /// Decodes `payload` and resolves every asset and raw resource it references.
    ///
    /// `on_complete` runs exactly once. When there is nothing to wait for it runs
    /// before this call returns, with `has_raw_payload == false`. Failed
    /// dependencies are logged and leave their slot holding
    /// [`Value::Unresolved`]; only a decode failure is reported as an error.
    pub fn resolve(
        &self,
        payload: &RawPayload,
        location: &str,
        context: Rc<LoadingContext>,
        target: Option<&ObjectRef>,
        on_complete: ResolveCallback,
    ) {
        let decoded = {
            let _timer = ScopedMetricTimer::new(&self.inner.metrics.decode_time);
            bump(&self.inner.metrics.decodes);
            self.inner.deserializer.decode(
                payload,
                DecodeOptions {
                    classes: &self.inner.classes,
                    target,
                    location,
                },
            )
        };
        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(e) => return on_complete(Err(e), false),
        };

        if let Some(remapper) = context.remapper() {
            remapper.extend(decoded.cross_references.iter().cloned());
        }

        let remaining = decoded.outstanding();
        if remaining == 0 {
            return on_complete(Ok(decoded.root), false);
        }

        let tracker = Rc::new(PendingDependencies {
            remaining: Cell::new(remaining),
            asset: decoded.root.clone(),
            has_raw_payload: decoded.raw_payload.is_some(),
            callback: RefCell::new(Some(on_complete)),
        });

        if let Some(raw) = decoded.raw_payload {
            let url = replace_extension(location, &raw.extension);
            let loader = self.inner.loader.clone();
            let asset = decoded.root.clone();
            let tracker = tracker.clone();
            tokio::task::spawn_local(async move {
                match loader.fetch(&url, raw.kind).await {
                    Ok(payload) => asset.set_field(raw.field, payload_into_value(payload)),
                    Err(e) => log::error!("Failed to load {:?} payload of {url}: {e}", raw.kind),
                }
                tracker.settle();
            });
        }

        for dependency in decoded.dependencies {
            let library = self.clone();
            let context = context.clone();
            let tracker = tracker.clone();
            tokio::task::spawn_local(async move {
                library.resolve_dependency(dependency, context, tracker).await;
            });
        }
    }

    async fn resolve_dependency(
        self,
        dependency: DependencyRef,
        context: Rc<LoadingContext>,
        tracker: Rc<PendingDependencies>,
    ) {
        let DependencyRef { uuid, slot } = dependency;
        let location = match self.inner.locations.lookup(uuid).await {
            Ok(location) => location,
            Err(e) => {
                log::error!("Failed to load \"{uuid}\": {e}");
                return tracker.settle();
            }
        };

        if location.is_raw {
            slot.set(Value::String(location.url.clone()));
            context.mark_for_preload(location.url);
            return tracker.settle();
        }

        let parent = context.clone();
        self.load_with_context(
            uuid,
            parent,
            None,
            Box::new(move |result| {
                match result {
                    Ok(asset) => {
                        slot.set(Value::Object(asset));
                    }
                    Err(e) => log_dependency_failure(uuid, &e),
                }
                tracker.settle();
            }),
        );
    }
}

fn log_dependency_failure(uuid: AssetUuid, error: &AssetError) {
    let failure = AssetError::DependencyFailure {
        uuid,
        reason: error.to_string(),
    };
    log::error!("{failure}");
}
