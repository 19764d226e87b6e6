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

//! The coordinator: single owner of every request and resource.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tether_core::{
    DependencyKey, DependencyKind, Descriptor, DescriptorError, Diagnostic, DiagnosticSink,
    LoadEvent, LoadRequest, LoadType, LogSink, RepositoryMap, RequestId, ResolvedDependencies,
    ResourceLoader, SettleChannel,
};
use tether_data::{
    DependencyStore, Registration, RequestPlan, ResourceEntry, ResourceSpec, ResourceStatus,
};
use tether_lanes::{standard_lanes, ByteSource, ScriptHost};
use tether_telemetry::{CounterHandle, GaugeHandle, MetricsRegistry, MetricsResult};

use super::dispatch::{InlineExecutor, LoadExecutor, ThreadedExecutor};
use super::loader::LoaderRegistry;
use super::scanner;
use crate::config::{CoordinatorConfig, ExecutorConfig};
use crate::error::CoordinatorError;

/// Metric handles owned by the coordinator itself.
struct CoordinatorMetrics {
    requests_completed_total: CounterHandle,
    syntax_errors_total: CounterHandle,
    pending_requests: GaugeHandle,
}

impl CoordinatorMetrics {
    fn new(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            requests_completed_total: registry.register_counter(
                "requests",
                "requests_completed_total",
                "Total number of requests whose callback fired",
            )?,
            syntax_errors_total: registry.register_counter(
                "requests",
                "syntax_errors_total",
                "Total number of descriptors rejected by the parser",
            )?,
            pending_requests: registry.register_gauge(
                "requests",
                "pending_requests",
                "Requests waiting for their dependencies",
                "requests",
            )?,
        })
    }
}

/// A snapshot of the coordinator's health.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorStatus {
    /// 1.0 when nothing failed, lower as failures accumulate.
    pub health_score: f32,
    /// `true` if requests are pending but no load is running, so nothing
    /// will ever complete them.
    pub is_stalled: bool,
    /// Requests waiting for their dependencies.
    pub pending_requests: usize,
    /// Loads dispatched that have not reported back.
    pub in_flight: usize,
    /// Resources tracked by the registry.
    pub tracked_resources: usize,
    /// Resources that failed to load.
    pub failed_resources: usize,
    /// Human-readable summary.
    pub message: String,
}

/// Coordinates loading of named dependencies for many concurrent requests.
///
/// Each distinct dependency is loaded at most once. A request's callback
/// fires exactly once, after every dependency it named has loaded; a request
/// naming a dependency that failed, or a descriptor that did not parse,
/// never completes.
///
/// Loads run on the configured executor. Their outcomes are applied when the
/// owner calls [`update`](Self::update) or
/// [`run_until_idle`](Self::run_until_idle); callbacks run on that thread.
pub struct Coordinator {
    repositories: RepositoryMap,
    script_extension: String,
    stylesheet_extension: String,
    store: DependencyStore,
    loaders: LoaderRegistry,
    executor: Box<dyn LoadExecutor>,
    settle: SettleChannel,
    diagnostics: Arc<dyn DiagnosticSink>,
    metrics: CoordinatorMetrics,
    in_flight: usize,
}

impl Coordinator {
    /// Creates a coordinator with no loaders, reporting diagnostics to the log.
    pub fn new(
        config: CoordinatorConfig,
        metrics_registry: &MetricsRegistry,
    ) -> Result<Self, CoordinatorError> {
        let executor: Box<dyn LoadExecutor> = match config.executor {
            ExecutorConfig::Inline => Box::new(InlineExecutor),
            ExecutorConfig::Threaded { workers } => Box::new(ThreadedExecutor::new(workers)?),
        };
        log::info!("Coordinator started with the {} executor", executor.name());

        Ok(Self {
            repositories: config.repository_map(),
            script_extension: config.script_extension,
            stylesheet_extension: config.stylesheet_extension,
            store: DependencyStore::new(),
            loaders: LoaderRegistry::new(metrics_registry)?,
            executor,
            settle: SettleChannel::new(),
            diagnostics: Arc::new(LogSink),
            metrics: CoordinatorMetrics::new(metrics_registry)?,
            in_flight: 0,
        })
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Replaces the executor.
    pub fn with_executor(mut self, executor: Box<dyn LoadExecutor>) -> Self {
        log::debug!("Switching to the {} executor", executor.name());
        self.executor = executor;
        self
    }

    /// Registers the standard lane for every kind.
    pub fn with_standard_lanes(
        mut self,
        source: Arc<dyn ByteSource>,
        host: Arc<dyn ScriptHost>,
    ) -> Self {
        for lane in standard_lanes(source, host) {
            self.register_loader(lane);
        }
        self
    }

    /// Registers `loader` for its kind, replacing any previous one.
    pub fn register_loader(&mut self, loader: Arc<dyn ResourceLoader>) {
        if self.loaders.register(loader).is_some() {
            log::debug!("Replaced a previously registered loader");
        }
    }

    /// Returns `true` if a loader is registered for `kind`.
    pub fn has_loader(&self, kind: DependencyKind) -> bool {
        self.loaders.contains(kind)
    }

    /// Maps a repository name to a base URI, replacing any previous mapping.
    pub fn add_repository(&mut self, name: impl Into<String>, base_uri: impl Into<String>) {
        let name = name.into();
        let base_uri = base_uri.into();
        log::info!("Repository '{name}' -> {base_uri}");
        self.repositories.add(name, base_uri);
    }

    /// The current repository mapping.
    pub fn repositories(&self) -> &RepositoryMap {
        &self.repositories
    }

    /// Declares the dependencies of a caller.
    ///
    /// `callback` fires exactly once, after every dependency has loaded. It
    /// may fire before this returns if everything was already loaded.
    /// Descriptors that fail to parse are reported as diagnostics and keep
    /// the request from ever completing.
    pub fn require<I, S, F>(
        &mut self,
        descriptors: I,
        callback: F,
        load_type: LoadType,
    ) -> RequestId
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(ResolvedDependencies) + Send + 'static,
    {
        let mut plan = RequestPlan {
            load_type,
            ..Default::default()
        };
        let id = plan.id;

        for descriptor in descriptors {
            let descriptor = descriptor.as_ref();
            match Descriptor::parse(descriptor) {
                Ok(parsed) => plan.dependencies.push(self.spec_for(&parsed)),
                Err(error) => {
                    self.report_syntax_error(descriptor, error);
                    plan.rejected.push(descriptor.to_string());
                }
            }
        }

        log::debug!(
            "Request {id}: {} dependencies, {} rejected",
            plan.dependencies.len(),
            plan.rejected.len()
        );

        // The entry is fully registered before any load starts, so even an
        // immediate load cannot observe a half-built request.
        let created = self.store.register(plan, Box::new(callback));
        for spec in created {
            self.dispatch(spec, load_type);
        }

        self.scan();
        id
    }

    /// Declares a single asynchronous dependency.
    pub fn require_one<F>(&mut self, descriptor: &str, callback: F) -> RequestId
    where
        F: FnOnce(ResolvedDependencies) + Send + 'static,
    {
        self.require([descriptor], callback, LoadType::Async)
    }

    /// Loads the stylesheet of `module` if it is not already tracked.
    ///
    /// Nobody waits on the stylesheet; failures only produce a diagnostic.
    pub fn add_stylesheet(&mut self, module: &str) -> Result<DependencyKey, DescriptorError> {
        let descriptor = match Descriptor::stylesheet(module) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                self.report_syntax_error(module, error.clone());
                return Err(error);
            }
        };

        let spec = self.spec_for(&descriptor);
        let key = spec.key.clone();
        match self.store.register_standalone(&spec) {
            Registration::Created => self.dispatch(spec, LoadType::Async),
            Registration::Existing(status) => {
                log::trace!("Stylesheet '{key}' already tracked ({status:?})");
            }
        }
        Ok(key)
    }

    /// Applies every settle event received so far. Returns the number of
    /// callbacks that fired.
    pub fn update(&mut self) -> usize {
        let mut fired = 0;
        while let Some(event) = self.settle.try_next() {
            fired += self.settle_event(event);
        }
        fired
    }

    /// Processes settle events until no load is in flight.
    ///
    /// Returns the number of callbacks that fired, or
    /// [`CoordinatorError::Timeout`] if loads are still running after
    /// `timeout`. Requests stalled on a failure do not keep this waiting.
    pub fn run_until_idle(&mut self, timeout: Duration) -> Result<usize, CoordinatorError> {
        let deadline = Instant::now() + timeout;
        let mut fired = self.update();

        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(event) = self.settle.wait(remaining) else {
                return Err(CoordinatorError::Timeout {
                    in_flight: self.in_flight,
                });
            };
            fired += self.settle_event(event);
            fired += self.update();
        }

        Ok(fired)
    }

    /// Status of the resource with the given key.
    pub fn status(&self, key: &str) -> Option<ResourceStatus> {
        self.store.registry().status(key)
    }

    /// The registry record of the resource with the given key.
    pub fn entry(&self, key: &str) -> Option<&ResourceEntry> {
        self.store.registry().get(key)
    }

    /// Returns `true` if the request has not completed.
    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.store.requests().contains(id)
    }

    /// Number of requests that have not completed.
    pub fn pending_requests(&self) -> usize {
        self.store.requests().len()
    }

    /// Number of resources ever referenced.
    pub fn tracked_resources(&self) -> usize {
        self.store.registry().len()
    }

    /// Number of dispatched loads that have not reported back.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Drops a pending request without firing it. Returns `false` if the
    /// request was already gone.
    pub fn remove_waiter(&mut self, id: &RequestId) -> bool {
        let removed = self.store.remove_waiter(id).is_some();
        self.refresh_pending_gauge();
        removed
    }

    /// Summarises the coordinator's state.
    pub fn report_status(&self) -> CoordinatorStatus {
        let pending_requests = self.pending_requests();
        let failed_resources = self
            .store
            .registry()
            .count_with_status(ResourceStatus::Failed);

        let health_score = if failed_resources == 0 {
            1.0
        } else if failed_resources < 5 {
            0.8
        } else if failed_resources < 20 {
            0.5
        } else {
            0.2
        };

        CoordinatorStatus {
            health_score,
            is_stalled: pending_requests > 0 && self.in_flight == 0,
            pending_requests,
            in_flight: self.in_flight,
            tracked_resources: self.tracked_resources(),
            failed_resources,
            message: format!(
                "pending={} in_flight={} tracked={} failed={}",
                pending_requests,
                self.in_flight,
                self.tracked_resources(),
                failed_resources
            ),
        }
    }

    fn spec_for(&self, descriptor: &Descriptor) -> ResourceSpec {
        let extension = match descriptor.kind() {
            DependencyKind::Stylesheet => self.stylesheet_extension.as_str(),
            _ => self.script_extension.as_str(),
        };
        ResourceSpec::from_descriptor(descriptor, &self.repositories, extension)
    }

    /// Starts the single load of a newly created resource.
    fn dispatch(&mut self, spec: ResourceSpec, load_type: LoadType) {
        let job = self.loaders.prepare(LoadRequest {
            key: spec.key,
            kind: spec.kind,
            source: spec.source,
            name: spec.name,
            load_type,
        });

        if job.is_immediate() {
            log::trace!("Loading '{}' during registration", job.key());
            let event = job.execute();
            self.apply(event);
            return;
        }

        log::debug!("Dispatching '{}' ({:?})", job.key(), load_type);
        self.in_flight += 1;
        let sender = self.settle.sender();
        let task = Box::new(move || sender.publish(job.execute()));
        self.executor.spawn(task, load_type);
    }

    fn settle_event(&mut self, event: LoadEvent) -> usize {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.apply(event) {
            self.scan()
        } else {
            0
        }
    }

    /// Applies one load outcome to the registry. Returns `true` if the
    /// resource became `Loaded`.
    fn apply(&mut self, event: LoadEvent) -> bool {
        let LoadEvent {
            key,
            outcome,
            elapsed,
        } = event;

        match outcome {
            Ok(value) => match self.store.registry_mut().mark_loaded(&key, value) {
                Ok(_) => {
                    log::debug!("'{key}' loaded in {elapsed:?}");
                    true
                }
                Err(e) => {
                    log::warn!("Ignoring settle event: {e}");
                    false
                }
            },
            Err(reason) => {
                match self.store.registry_mut().mark_failed(&key, reason.clone()) {
                    Ok(entry) => {
                        let diagnostic = Diagnostic::LoadFailed {
                            key: key.clone(),
                            source: entry.source().to_string(),
                            error: reason,
                        };
                        self.diagnostics.report(&diagnostic);
                    }
                    Err(e) => log::warn!("Ignoring settle event: {e}"),
                }
                false
            }
        }
    }

    fn scan(&mut self) -> usize {
        let fired = scanner::scan(&mut self.store);
        if fired > 0 {
            record(self.metrics.requests_completed_total.increment_by(fired as u64));
        }
        self.refresh_pending_gauge();
        fired
    }

    fn report_syntax_error(&self, descriptor: &str, error: DescriptorError) {
        record(self.metrics.syntax_errors_total.increment());
        self.diagnostics.report(&Diagnostic::Syntax {
            descriptor: descriptor.to_string(),
            error,
        });
    }

    fn refresh_pending_gauge(&self) {
        record(
            self.metrics
                .pending_requests
                .set(self.store.requests().len() as f64),
        );
    }
}

fn record<T>(result: MetricsResult<T>) {
    if let Err(e) = result {
        log::warn!("Failed to record coordinator metric: {e}");
    }
}
