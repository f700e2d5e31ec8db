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

use crate::metrics::{Metric, MetricId, MetricsError, MetricsResult};
use crate::storage::backend::MetricsBackend;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps every metric in a locked map for the lifetime of the registry.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the metrics under `namespace`; empty if the lock is poisoned.
    pub fn get_metrics_by_namespace(&self, namespace: &str) -> Vec<Metric> {
        match self.storage.read() {
            Ok(storage) => storage
                .values()
                .filter(|metric| metric.id.namespace == namespace)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;
        storage.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self
            .storage
            .read()
            .map_err(|_| MetricsError::StorageError("Failed to acquire read lock".to_string()))?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn metric_count(&self) -> usize {
        self.storage.read().map(|storage| storage.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;

    #[test]
    fn test_counter_increment() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "fetches_total");
        backend
            .put_metric(Metric::new_counter(id.clone(), "fetches", 0))
            .unwrap();

        assert_eq!(backend.increment_counter(&id, 2).unwrap(), 2);
        assert_eq!(backend.increment_counter(&id, 1).unwrap(), 3);
    }

    #[test]
    fn test_histogram_buckets() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "decode_time");
        backend
            .put_metric(Metric::new_histogram(id.clone(), "decode", "ms", vec![1.0, 10.0]))
            .unwrap();

        backend.record_histogram_sample(&id, 0.5).unwrap();
        backend.record_histogram_sample(&id, 5.0).unwrap();
        backend.record_histogram_sample(&id, 50.0).unwrap();

        let metric = backend.get_metric(&id).unwrap();
        match metric.value {
            MetricValue::Histogram {
                samples,
                bucket_counts,
                ..
            } => {
                assert_eq!(samples.len(), 3);
                assert_eq!(bucket_counts, vec![1, 1]);
            }
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "fetches_total");
        backend
            .put_metric(Metric::new_counter(id.clone(), "fetches", 0))
            .unwrap();
        assert!(matches!(
            backend.record_histogram_sample(&id, 1.0),
            Err(MetricsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_namespace_filter() {
        let backend = InMemoryBackend::new();
        backend
            .put_metric(Metric::new_counter(MetricId::new("assets", "a"), "", 0))
            .unwrap();
        backend
            .put_metric(Metric::new_counter(MetricId::new("scene", "b"), "", 0))
            .unwrap();
        assert_eq!(backend.get_metrics_by_namespace("assets").len(), 1);
        assert_eq!(backend.metric_count(), 2);
    }
}
