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

use crate::metrics::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
use std::fmt::Debug;

/// Where metric values live. Updates are read-modify-write on whole metrics.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Inserts `metric`, replacing any metric with the same id.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// A copy of the metric stored under `id`.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Number of stored metrics.
    fn metric_count(&self) -> usize;

    /// Adds `delta` to a counter, saturating, and returns the new value.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut metric = self.get_metric(id)?;
        let MetricValue::Counter(value) = &mut metric.value else {
            return Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.value.metric_type(),
            });
        };
        *value = value.saturating_add(delta);
        let updated = *value;
        self.put_metric(metric)?;
        Ok(updated)
    }

    /// Appends `sample` to a histogram and bumps the first bucket whose bound covers it.
    ///
    /// Samples above every bound are kept but counted in no bucket.
    fn record_histogram_sample(&self, id: &MetricId, sample: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;
        let MetricValue::Histogram {
            samples,
            bucket_bounds,
            bucket_counts,
        } = &mut metric.value
        else {
            return Err(MetricsError::TypeMismatch {
                expected: MetricType::Histogram,
                found: metric.value.metric_type(),
            });
        };
        samples.push(sample);
        if let Some(bucket) = bucket_bounds.iter().position(|bound| sample <= *bound) {
            bucket_counts[bucket] += 1;
        }
        self.put_metric(metric)
    }
}
