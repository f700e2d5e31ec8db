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

//! Named counters and histograms, and the handles that update them.

use super::{Metric, MetricId, MetricType, MetricsError, MetricsResult};
use crate::storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
use std::sync::Arc;

/// Owns the metrics of one asset library (fetches, decodes, cache hits, merged
/// requests and decode time).
///
/// Components register their metrics once and keep the returned handles; tests
/// and tooling read values back by namespace and name. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    backend: Arc<InMemoryBackend>,
}

/// Reads `id` as a counter.
fn read_counter(backend: &InMemoryBackend, id: &MetricId) -> MetricsResult<u64> {
    let metric = backend.get_metric(id)?;
    metric
        .value
        .as_counter()
        .ok_or_else(|| MetricsError::TypeMismatch {
            expected: MetricType::Counter,
            found: metric.value.metric_type(),
        })
}

impl MetricsRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a counter starting at zero. Registering an existing id resets it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::new_counter(id.clone(), description, 0))?;
        Ok(CounterHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a histogram with the given bucket upper bounds, in `unit`.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::new_histogram(id.clone(), description, unit, buckets))?;
        Ok(HistogramHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Snapshot of one metric.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Current value of the counter `namespace.name`.
    pub fn counter_value(&self, namespace: &str, name: &str) -> MetricsResult<u64> {
        read_counter(&self.backend, &MetricId::new(namespace, name))
    }

    /// Snapshot of every metric under `namespace`.
    pub fn namespace_snapshot(&self, namespace: &str) -> Vec<Metric> {
        self.backend.get_metrics_by_namespace(namespace)
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }
}

/// Updates one registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<InMemoryBackend>,
}

impl CounterHandle {
    /// Adds one and returns the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// The current value.
    pub fn get(&self) -> MetricsResult<u64> {
        read_counter(&self.backend, &self.id)
    }

    /// The counter's id, for log messages.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Records samples into one registered histogram.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    backend: Arc<InMemoryBackend>,
}

impl HistogramHandle {
    /// Records one sample.
    pub fn observe(&self, value: f64) -> MetricsResult<()> {
        self.backend.record_histogram_sample(&self.id, value)
    }

    /// The histogram's id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }

    /// Snapshot of the samples and bucket counts.
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.backend.get_metric(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.metric_count(), 0);
    }

    #[test]
    fn test_counter_registration_and_operations() {
        let registry = MetricsRegistry::new();

        let counter = registry
            .register_counter("assets", "fetches_total", "Payload fetches issued")
            .unwrap();

        assert_eq!(counter.increment().unwrap(), 1);
        assert_eq!(counter.increment().unwrap(), 2);
        assert_eq!(counter.get().unwrap(), 2);

        assert!(registry.get_metric(counter.id()).is_ok());
        assert_eq!(registry.counter_value("assets", "fetches_total").unwrap(), 2);
    }

    #[test]
    fn test_histogram_registration_and_operations() {
        let registry = MetricsRegistry::new();

        let histogram = registry
            .register_histogram(
                "assets",
                "decode_time",
                "Time spent decoding payloads",
                "ms",
                vec![1.0, 5.0, 10.0, 50.0],
            )
            .unwrap();

        histogram.observe(2.5).unwrap();
        histogram.observe(15.0).unwrap();

        let metric = histogram.get_metric().unwrap();
        if let MetricValue::Histogram { samples, .. } = metric.value {
            assert_eq!(samples, vec![2.5, 15.0]);
        } else {
            panic!("Expected histogram metric");
        }
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = MetricsRegistry::new();
        let other = registry.clone();
        registry.register_counter("assets", "x", "").unwrap();
        assert_eq!(other.metric_count(), 1);
        assert_eq!(other.namespace_snapshot("assets").len(), 1);
    }

    #[test]
    fn test_unknown_counter() {
        let registry = MetricsRegistry::new();
        assert!(matches!(
            registry.counter_value("assets", "missing"),
            Err(MetricsError::MetricNotFound(_))
        ));
    }

    #[test]
    fn test_counter_read_of_histogram_is_a_mismatch() {
        let registry = MetricsRegistry::new();
        registry
            .register_histogram("assets", "decode_time", "", "ms", vec![1.0])
            .unwrap();
        assert!(matches!(
            registry.counter_value("assets", "decode_time"),
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Histogram,
            })
        ));
    }
}
