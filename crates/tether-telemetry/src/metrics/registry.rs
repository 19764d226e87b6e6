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

use super::{Metric, MetricId, MetricValue, MetricsError, MetricsResult};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

type Storage = Arc<RwLock<BTreeMap<MetricId, Metric>>>;

/// Thread-safe store of every registered metric.
///
/// Handles returned by the `register_*` methods share the storage and can be
/// moved to worker threads.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    storage: Storage,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a counter starting at zero.
    ///
    /// Registering an existing counter returns a handle to it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = self.register(Metric {
            id: MetricId::new(namespace, name),
            description: description.into(),
            unit: String::new(),
            value: MetricValue::Counter { value: 0 },
        })?;
        Ok(CounterHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Registers a gauge starting at zero.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = self.register(Metric {
            id: MetricId::new(namespace, name),
            description: description.into(),
            unit: unit.into(),
            value: MetricValue::Gauge { value: 0.0 },
        })?;
        Ok(GaugeHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Registers a histogram with the given ascending bucket bounds.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        mut buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        buckets.sort_by(f64::total_cmp);
        let bucket_counts = vec![0; buckets.len() + 1];
        let id = self.register(Metric {
            id: MetricId::new(namespace, name),
            description: description.into(),
            unit: unit.into(),
            value: MetricValue::Histogram {
                bucket_bounds: buckets,
                bucket_counts,
                count: 0,
                sum: 0.0,
            },
        })?;
        Ok(HistogramHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    fn register(&self, metric: Metric) -> MetricsResult<MetricId> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::LockPoisoned)?;
        if let Some(existing) = storage.get(&metric.id) {
            if existing.value.kind() != metric.value.kind() {
                return Err(MetricsError::TypeMismatch {
                    id: metric.id.clone(),
                    expected: metric.value.kind(),
                    found: existing.value.kind(),
                });
            }
            return Ok(metric.id);
        }
        let id = metric.id.clone();
        log::trace!("Registered metric '{id}'");
        storage.insert(id.clone(), metric);
        Ok(id)
    }

    /// Returns a copy of the metric.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self.storage.read().map_err(|_| MetricsError::LockPoisoned)?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::NotFound(id.clone()))
    }

    /// Returns `true` if the metric is registered.
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.storage
            .read()
            .map(|storage| storage.contains_key(id))
            .unwrap_or(false)
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.storage.read().map(|storage| storage.len()).unwrap_or(0)
    }

    /// Copies every metric, ordered by id.
    pub fn snapshot(&self) -> MetricsResult<Vec<Metric>> {
        let storage = self.storage.read().map_err(|_| MetricsError::LockPoisoned)?;
        Ok(storage.values().cloned().collect())
    }

    /// Renders the snapshot as pretty JSON.
    pub fn to_json(&self) -> MetricsResult<String> {
        serde_json::to_string_pretty(&self.snapshot()?)
            .map_err(|e| MetricsError::Serialization(e.to_string()))
    }
}

fn update<T>(
    storage: &Storage,
    id: &MetricId,
    f: impl FnOnce(&mut MetricValue) -> Option<T>,
    expected: &'static str,
) -> MetricsResult<T> {
    let mut storage = storage.write().map_err(|_| MetricsError::LockPoisoned)?;
    let metric = storage
        .get_mut(id)
        .ok_or_else(|| MetricsError::NotFound(id.clone()))?;
    let found = metric.value.kind();
    f(&mut metric.value).ok_or_else(|| MetricsError::TypeMismatch {
        id: id.clone(),
        expected,
        found,
    })
}

/// Handle to a registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    storage: Storage,
}

impl CounterHandle {
    /// Increments the counter by 1, returning the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Increments the counter by `amount`, returning the new value.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        update(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Counter { value } => {
                    *value = value.saturating_add(amount);
                    Some(*value)
                }
                _ => None,
            },
            "counter",
        )
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<u64> {
        update(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Counter { value } => Some(*value),
                _ => None,
            },
            "counter",
        )
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    storage: Storage,
}

impl GaugeHandle {
    /// Sets the gauge.
    pub fn set(&self, new_value: f64) -> MetricsResult<()> {
        update(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Gauge { value } => {
                    *value = new_value;
                    Some(())
                }
                _ => None,
            },
            "gauge",
        )
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<f64> {
        update(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Gauge { value } => Some(*value),
                _ => None,
            },
            "gauge",
        )
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered histogram.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    storage: Storage,
}

impl HistogramHandle {
    /// Records one sample.
    pub fn observe(&self, sample: f64) -> MetricsResult<()> {
        update(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Histogram {
                    bucket_bounds,
                    bucket_counts,
                    count,
                    sum,
                } => {
                    let bucket = bucket_bounds
                        .iter()
                        .position(|bound| sample <= *bound)
                        .unwrap_or(bucket_bounds.len());
                    bucket_counts[bucket] += 1;
                    *count += 1;
                    *sum += sample;
                    Some(())
                }
                _ => None,
            },
            "histogram",
        )
    }

    /// Number of samples recorded.
    pub fn count(&self) -> MetricsResult<u64> {
        update(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Histogram { count, .. } => Some(*count),
                _ => None,
            },
            "histogram",
        )
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
