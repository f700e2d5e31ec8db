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

use anyhow::{Context, Result};
use tessera_telemetry::{CounterHandle, HistogramHandle, MetricsRegistry};

/// Metric handles updated by the asset library.
pub(crate) struct LibraryMetrics {
    /// Payload fetches issued for identifier-keyed loads.
    pub(crate) fetches: CounterHandle,
    /// Decode calls.
    pub(crate) decodes: CounterHandle,
    /// Loads served from a cache tier.
    pub(crate) cache_hits: CounterHandle,
    /// Loads that joined an in-flight request.
    pub(crate) merged_requests: CounterHandle,
    /// Time spent decoding, in milliseconds.
    pub(crate) decode_time: HistogramHandle,
}

impl LibraryMetrics {
    pub(crate) fn new(registry: &MetricsRegistry) -> Result<Self> {
        Ok(Self {
            fetches: registry
                .register_counter("assets", "fetches_total", "Asset payload fetches")
                .context("Failed to register asset fetch metric")?,
            decodes: registry
                .register_counter("assets", "decodes_total", "Asset payload decodes")
                .context("Failed to register asset decode metric")?,
            cache_hits: registry
                .register_counter("assets", "cache_hits_total", "Loads served from a cache")
                .context("Failed to register cache hit metric")?,
            merged_requests: registry
                .register_counter(
                    "assets",
                    "merged_requests_total",
                    "Loads merged into an in-flight request",
                )
                .context("Failed to register merged request metric")?,
            decode_time: registry
                .register_histogram(
                    "assets",
                    "decode_time",
                    "Asset decoding time",
                    "ms",
                    vec![0.1, 1.0, 5.0, 16.0, 33.0, 100.0],
                )
                .context("Failed to register decode time metric")?,
        })
    }
}

/// Increments `counter`, logging instead of failing the load.
pub(crate) fn bump(counter: &CounterHandle) {
    if let Err(e) = counter.increment() {
        log::warn!("Failed to update metric {}: {}", counter.id(), e);
    }
}
