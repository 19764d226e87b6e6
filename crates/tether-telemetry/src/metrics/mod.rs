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

//! Metric identifiers, values and the registry that stores them.

mod registry;

pub use registry::{CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry};

use serde::Serialize;
use std::fmt::{self, Display};
use thiserror::Error;

/// Identifies a metric by namespace and name, e.g. `loads:started_total`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MetricId {
    /// The broad category of the metric (e.g. "loads", "requests").
    pub namespace: String,
    /// The specific name of the metric.
    pub name: String,
}

impl MetricId {
    /// Creates a new `MetricId`.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricValue {
    /// A value that only ever increases.
    Counter {
        /// Current count.
        value: u64,
    },
    /// A value that can go up or down.
    Gauge {
        /// Current value.
        value: f64,
    },
    /// A distribution of samples over fixed buckets.
    Histogram {
        /// Upper bounds of the buckets, ascending.
        bucket_bounds: Vec<f64>,
        /// Samples per bucket; the last slot counts samples above every bound.
        bucket_counts: Vec<u64>,
        /// Number of samples.
        count: u64,
        /// Sum of all samples.
        sum: f64,
    },
}

impl MetricValue {
    fn kind(&self) -> &'static str {
        match self {
            MetricValue::Counter { .. } => "counter",
            MetricValue::Gauge { .. } => "gauge",
            MetricValue::Histogram { .. } => "histogram",
        }
    }
}

/// A registered metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    /// Identity of the metric.
    pub id: MetricId,
    /// Human-readable description.
    pub description: String,
    /// Unit of the values, empty for plain counts.
    pub unit: String,
    /// Current value.
    pub value: MetricValue,
}

/// Errors raised by the metrics registry.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    /// No metric with this id is registered.
    #[error("Metric '{0}' is not registered")]
    NotFound(MetricId),
    /// A metric with this id is already registered with another type.
    #[error("Metric '{id}' is a {found}, expected a {expected}")]
    TypeMismatch {
        /// The metric.
        id: MetricId,
        /// The type the operation needed.
        expected: &'static str,
        /// The type that is registered.
        found: &'static str,
    },
    /// A thread panicked while holding the registry lock.
    #[error("Metrics storage lock is poisoned")]
    LockPoisoned,
    /// Snapshot serialization failed.
    #[error("Failed to serialize metrics: {0}")]
    Serialization(String),
}

/// Result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
