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

//! A registry of resource loaders keyed by dependency kind.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tether_core::{DependencyKey, DependencyKind, LoadEvent, LoadRequest, ResourceLoader};
use tether_telemetry::{
    CounterHandle, HistogramHandle, MetricsRegistry, MetricsResult, ScopedMetricTimer,
};

/// Metric handles shared by every load job.
struct LoaderMetrics {
    /// Loader wall time in milliseconds.
    load_time_ms: HistogramHandle,
    loads_started_total: CounterHandle,
    loads_failed_total: CounterHandle,
}

impl LoaderMetrics {
    fn new(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            load_time_ms: registry.register_histogram(
                "loads",
                "load_time",
                "Time spent inside resource loaders",
                "ms",
                vec![1.0, 5.0, 16.0, 33.0, 100.0, 500.0],
            )?,
            loads_started_total: registry.register_counter(
                "loads",
                "loads_started_total",
                "Total number of loads started",
            )?,
            loads_failed_total: registry.register_counter(
                "loads",
                "loads_failed_total",
                "Total number of loads that failed",
            )?,
        })
    }
}

/// The loaders known to a coordinator.
pub(crate) struct LoaderRegistry {
    metrics: Arc<LoaderMetrics>,
    loaders: HashMap<DependencyKind, Arc<dyn ResourceLoader>>,
}

impl LoaderRegistry {
    pub(crate) fn new(metrics_registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            metrics: Arc::new(LoaderMetrics::new(metrics_registry)?),
            loaders: HashMap::new(),
        })
    }

    /// Registers `loader` for its kind, returning the loader it replaces.
    pub(crate) fn register(
        &mut self,
        loader: Arc<dyn ResourceLoader>,
    ) -> Option<Arc<dyn ResourceLoader>> {
        let kind = loader.kind();
        log::debug!("Registered loader for kind '{kind}'");
        self.loaders.insert(kind, loader)
    }

    pub(crate) fn contains(&self, kind: DependencyKind) -> bool {
        self.loaders.contains_key(&kind)
    }

    /// Packages `request` with its loader into a job that can run anywhere.
    pub(crate) fn prepare(&self, request: LoadRequest) -> LoadJob {
        LoadJob {
            loader: self.loaders.get(&request.kind).cloned(),
            request,
            metrics: self.metrics.clone(),
        }
    }
}

/// One load, ready to execute on any thread.
pub(crate) struct LoadJob {
    loader: Option<Arc<dyn ResourceLoader>>,
    request: LoadRequest,
    metrics: Arc<LoaderMetrics>,
}

impl LoadJob {
    pub(crate) fn key(&self) -> &DependencyKey {
        &self.request.key
    }

    /// `true` if the job should run during registration.
    pub(crate) fn is_immediate(&self) -> bool {
        self.loader
            .as_ref()
            .is_some_and(|loader| loader.is_immediate())
    }

    /// Runs the loader and turns its outcome into exactly one settle event.
    ///
    /// A missing loader or a panicking loader is reported as a failure.
    pub(crate) fn execute(self) -> LoadEvent {
        let started = Instant::now();
        record(self.metrics.loads_started_total.increment());

        let outcome = match &self.loader {
            Some(loader) => {
                let _timer = ScopedMetricTimer::new(&self.metrics.load_time_ms);
                panic::catch_unwind(AssertUnwindSafe(|| loader.load(&self.request)))
                    .unwrap_or_else(|_| Err("loader panicked".into()))
                    .map_err(|e| e.to_string())
            }
            None => Err(format!(
                "No loader registered for kind '{}'",
                self.request.kind
            )),
        };

        if outcome.is_err() {
            record(self.metrics.loads_failed_total.increment());
        }

        LoadEvent {
            key: self.request.key,
            outcome,
            elapsed: started.elapsed(),
        }
    }
}

fn record<T>(result: MetricsResult<T>) {
    if let Err(e) = result {
        log::warn!("Failed to record load metric: {e}");
    }
}
