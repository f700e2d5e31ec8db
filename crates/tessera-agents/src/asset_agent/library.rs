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

//! The asset library: identifier-keyed loading with request merging and
//! tiered caching.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use tessera_core::asset::{
    AssetError, AssetLocation, AssetResult, AssetUuid, Deserializer, LoadCallback,
    LocationResolver, PayloadKind, RawLoader, RawPayload,
};
use tessera_core::config::LibraryConfig;
use tessera_core::graph::{ClassRegistry, CrossReferenceRemapper, ForeignRef, ObjectRef, Value};
use tessera_core::vfs::VirtualFileSystem;
use tessera_data::assets::{AssetCache, LoadingContext, PendingRequests};
use tessera_lanes::{FsRawLoader, GraphInstantiator, JsonDeserializer};
use tessera_telemetry::MetricsRegistry;
use tokio::sync::oneshot;

use super::metrics::{bump, LibraryMetrics};
use super::{LoadOptions, PayloadLoadOptions, ReleaseTarget};

/// Loads assets by identifier, resolves their references and clones object graphs.
///
/// The handle is cheap to clone; clones drive the same caches. Every operation
/// that completes asynchronously spawns `tokio::task::spawn_local` tasks and must
/// therefore be called from inside a `tokio::task::LocalSet`.
///
/// # Examples
///
/// ```rust,ignore
/// let library = AssetLibrary::from_config(&config, "assets/", classes)?;
/// let local = tokio::task::LocalSet::new();
/// let scene = local
///     .run_until(library.load(scene_uuid, LoadOptions::default()))
///     .await?;
/// ```
#[derive(Clone)]
pub struct AssetLibrary {
    pub(super) inner: Rc<LibraryInner>,
}

pub(super) struct LibraryInner {
    pub(super) shared: AssetCache,
    pub(super) pending: PendingRequests,
    pub(super) locations: Rc<dyn LocationResolver>,
    pub(super) loader: Rc<dyn RawLoader>,
    pub(super) deserializer: Box<dyn Deserializer>,
    pub(super) instantiator: GraphInstantiator,
    pub(super) classes: ClassRegistry,
    pub(super) registry: MetricsRegistry,
    pub(super) metrics: LibraryMetrics,
}

/// Assembles an [`AssetLibrary`] from its collaborators.
pub struct AssetLibraryBuilder {
    locations: Rc<dyn LocationResolver>,
    loader: Rc<dyn RawLoader>,
    deserializer: Box<dyn Deserializer>,
    classes: ClassRegistry,
    registry: MetricsRegistry,
}

impl AssetLibraryBuilder {
    /// Sets the classes the decoder can instantiate.
    pub fn classes(mut self, classes: ClassRegistry) -> Self {
        self.classes = classes;
        self
    }

    /// Replaces the default [`JsonDeserializer`].
    pub fn deserializer(mut self, deserializer: Box<dyn Deserializer>) -> Self {
        self.deserializer = deserializer;
        self
    }

    /// Records metrics into `registry` instead of a private one.
    pub fn metrics(mut self, registry: MetricsRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builds the library.
    pub fn build(self) -> Result<AssetLibrary> {
        let metrics = LibraryMetrics::new(&self.registry)
            .context("Failed to initialize asset library metrics")?;
        log::debug!(
            "AssetLibrary: loader '{}', decoder '{}', {} classes",
            self.loader.strategy_name(),
            self.deserializer.strategy_name(),
            self.classes.len()
        );
        Ok(AssetLibrary {
            inner: Rc::new(LibraryInner {
                shared: AssetCache::new(),
                pending: PendingRequests::new(),
                locations: self.locations,
                loader: self.loader,
                deserializer: self.deserializer,
                instantiator: GraphInstantiator::new(),
                classes: self.classes,
                registry: self.registry,
                metrics,
            }),
        })
    }
}

/// Runs `f` on the next scheduler tick.
pub(super) fn defer(f: impl FnOnce() + 'static) {
    tokio::task::spawn_local(async move { f() });
}

impl AssetLibrary {
    /// Starts building a library over the given location resolver and loader.
    pub fn builder(
        locations: Rc<dyn LocationResolver>,
        loader: Rc<dyn RawLoader>,
    ) -> AssetLibraryBuilder {
        AssetLibraryBuilder {
            locations,
            loader,
            deserializer: Box::new(JsonDeserializer::new()),
            classes: ClassRegistry::new(),
            registry: MetricsRegistry::new(),
        }
    }

    /// A library reading the layout described by `config` from the filesystem under `root_dir`.
    pub fn from_config(
        config: &LibraryConfig,
        root_dir: impl Into<PathBuf>,
        classes: ClassRegistry,
    ) -> Result<Self> {
        let vfs = VirtualFileSystem::new(config);
        let loader = FsRawLoader::new(root_dir);
        Self::builder(Rc::new(vfs), Rc::new(loader))
            .classes(classes)
            .build()
    }

    /// The registry holding this library's metrics.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.inner.registry
    }

    /// The classes known to the decoder.
    pub fn classes(&self) -> &ClassRegistry {
        &self.inner.classes
    }

    /// Number of identifier-keyed loads in flight.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    /// Creates a loading context over the shared cache.
    pub fn create_context(&self, read_shared: bool, write_shared: bool) -> LoadingContext {
        LoadingContext::new(self.inner.shared.clone(), read_shared, write_shared)
    }

    /// Loads the asset named by the textual identifier `id`.
    ///
    /// `callback` runs exactly once, never before this call returns. A malformed
    /// identifier fails with [`AssetError::InvalidArgument`] on the next tick.
    pub fn load_by_identifier(
        &self,
        id: &str,
        options: LoadOptions,
        callback: impl FnOnce(AssetResult<ObjectRef>) + 'static,
    ) {
        let uuid = match AssetUuid::parse(id) {
            Ok(uuid) => uuid,
            Err(e) => {
                defer(move || callback(Err(e)));
                return;
            }
        };
        let context = Rc::new(self.create_context(options.read_shared, options.write_shared));
        self.load_with_context(uuid, context, options.existing_target, Box::new(callback));
    }

    /// Loads `uuid` and waits for the result.
    pub async fn load(&self, uuid: AssetUuid, options: LoadOptions) -> AssetResult<ObjectRef> {
        let (tx, rx) = oneshot::channel();
        let context = Rc::new(self.create_context(options.read_shared, options.write_shared));
        self.load_with_context(
            uuid,
            context,
            options.existing_target,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx.await
            .unwrap_or_else(|_| Err(AssetError::NotFound(format!("Load of {uuid} was abandoned"))))
    }

    /// Loads `uuid` within an existing loading context.
    ///
    /// Without a target, a cache hit in the context's tiers is delivered on the
    /// next tick. Loads that read the shared cache and have no target are merged
    /// with any load of the same identifier already in flight.
    pub fn load_with_context(
        &self,
        uuid: AssetUuid,
        context: Rc<LoadingContext>,
        target: Option<ObjectRef>,
        callback: LoadCallback,
    ) {
        if target.is_none() {
            if let Some(asset) = context.read_cache(&uuid) {
                log::trace!("Cache hit for {uuid}");
                bump(&self.inner.metrics.cache_hits);
                defer(move || callback(Ok(asset)));
                return;
            }
        }

        let mergeable = context.reads_shared() && target.is_none();
        let direct = if mergeable {
            if !self.inner.pending.add(uuid, callback) {
                log::debug!("Joined in-flight load of {uuid}");
                bump(&self.inner.metrics.merged_requests);
                return;
            }
            None
        } else {
            Some(callback)
        };

        let library = self.clone();
        tokio::task::spawn_local(async move {
            library.fetch_and_resolve(uuid, context, target, direct).await;
        });
    }

    async fn fetch_and_resolve(
        self,
        uuid: AssetUuid,
        context: Rc<LoadingContext>,
        target: Option<ObjectRef>,
        direct: Option<LoadCallback>,
    ) {
        let location = match self.inner.locations.lookup(uuid).await {
            Ok(location) => location,
            Err(e) => return self.finish(uuid, direct, Err(e)),
        };
        if location.is_raw {
            return self.finish(uuid, direct, Err(AssetError::TypeMismatch { uuid }));
        }

        bump(&self.inner.metrics.fetches);
        let payload = match self.inner.loader.fetch(&location.url, PayloadKind::Json).await {
            Ok(payload) => payload,
            Err(e) => return self.finish(uuid, direct, Err(e)),
        };

        let library = self.clone();
        let write_context = context.clone();
        self.resolve(
            &payload,
            &location.url,
            context,
            target.as_ref(),
            Box::new(move |result, has_raw_payload| {
                let result = result.map(|asset| {
                    asset.set_uuid(uuid);
                    write_context.write_cache(uuid, &asset, has_raw_payload);
                    asset
                });
                library.finish(uuid, direct, result);
            }),
        );
    }

    /// Delivers the outcome of a load to its direct caller or to every merged waiter.
    fn finish(
        &self,
        uuid: AssetUuid,
        direct: Option<LoadCallback>,
        result: AssetResult<ObjectRef>,
    ) {
        if let Err(e) = &result {
            log::debug!("Load of {uuid} failed: {e}");
        }
        match direct {
            Some(callback) => callback(result),
            None => {
                self.inner.pending.invoke_and_remove(&uuid, result);
            }
        }
    }

    /// Resolves an in-memory payload and everything it references.
    ///
    /// The returned context exposes the side collections requested in `options`
    /// (post-load assets, preload URLs, cross-references). `callback` runs exactly
    /// once and never before this call returns.
    pub fn load_from_raw_payload(
        &self,
        payload: RawPayload,
        options: PayloadLoadOptions,
        callback: impl FnOnce(AssetResult<ObjectRef>) + 'static,
    ) -> Rc<LoadingContext> {
        let mut context = self.create_context(!options.isolate, !options.isolate);
        if options.collect_post_load_assets {
            context = context.with_post_load_collection();
        }
        if options.collect_foreign_remap {
            context = context.with_remapper();
        }
        let context = Rc::new(context);

        let same_tick = Rc::new(Cell::new(true));
        let deferred = same_tick.clone();
        self.resolve(
            &payload,
            "",
            context.clone(),
            None,
            Box::new(move |result, _| {
                if deferred.get() {
                    defer(move || callback(result));
                } else {
                    callback(result);
                }
            }),
        );
        same_tick.set(false);
        context
    }

    /// The asset resident in the shared cache under `uuid`. Performs no I/O.
    pub fn get_resident(&self, uuid: &AssetUuid) -> Option<ObjectRef> {
        self.inner.shared.get(uuid)
    }

    /// Removes an asset from the shared cache so the next load fetches it again.
    ///
    /// Holders keep a usable asset unless `destroy_now` is set, in which case the
    /// asset is invalidated for everyone.
    pub fn release(&self, target: impl Into<ReleaseTarget>, destroy_now: bool) {
        let asset = match target.into() {
            ReleaseTarget::Uuid(uuid) => self.inner.shared.get(&uuid),
            ReleaseTarget::Asset(asset) => Some(asset),
        };
        let Some(asset) = asset else { return };
        if destroy_now && asset.is_valid() {
            asset.destroy();
        }
        if let Some(uuid) = asset.uuid() {
            self.inner.shared.remove(&uuid);
        }
    }

    /// Where the bytes of `uuid` live.
    pub async fn query_asset_info(&self, uuid: AssetUuid) -> AssetResult<AssetLocation> {
        self.inner.locations.lookup(uuid).await
    }

    /// Clones the graph rooted at `root`, logging and returning `None` on invalid input.
    ///
    /// A scoped foreign root (a scene node) is cloned with itself as the scope:
    /// its subtree is copied and every object outside it stays shared.
    pub fn instantiate(&self, root: &Value) -> Option<Value> {
        let scope = root.as_foreign().filter(|node| node.scoped().is_some());
        match self.inner.instantiator.instantiate(root, scope, None) {
            Ok(clone) => Some(clone),
            Err(e) => {
                log::error!("Failed to instantiate {root:?}: {e}");
                None
            }
        }
    }

    /// Clones the graph rooted at `root`, copying only scoped foreign objects
    /// inside `scope` and registering their owner slots with `remapper`.
    pub fn instantiate_scoped(
        &self,
        root: &Value,
        scope: Option<&ForeignRef>,
        remapper: Option<&CrossReferenceRemapper>,
    ) -> AssetResult<Value> {
        self.inner.instantiator.instantiate(root, scope, remapper)
    }
}
