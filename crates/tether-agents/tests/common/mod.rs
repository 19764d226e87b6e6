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

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tether_agents::{Coordinator, CoordinatorConfig, ExecutorConfig};
use tether_core::{
    ChannelSink, DependencyKind, Diagnostic, ImageData, LoadError, LoadRequest, LoadedValue,
    ResolvedDependencies, ResourceLoader,
};
use tether_telemetry::MetricsRegistry;

/// Everything a callback received, one entry per invocation.
pub type Calls = Arc<Mutex<Vec<ResolvedDependencies>>>;

/// Returns a call log and a callback appending to it.
pub fn recorder() -> (Calls, impl FnOnce(ResolvedDependencies) + Send + 'static) {
    let calls: Calls = Arc::default();
    let log = calls.clone();
    (calls, move |resolved| log.lock().unwrap().push(resolved))
}

pub fn call_count(calls: &Calls) -> usize {
    calls.lock().unwrap().len()
}

pub fn config(executor: ExecutorConfig) -> CoordinatorConfig {
    let mut config = CoordinatorConfig {
        executor,
        ..Default::default()
    };
    config
        .repositories
        .insert("opensource".to_string(), "https://host/repo".to_string());
    config
}

/// Builds a coordinator wired to a channel sink.
pub fn coordinator(
    executor: ExecutorConfig,
) -> (Coordinator, flume::Receiver<Diagnostic>, MetricsRegistry) {
    let metrics = MetricsRegistry::new();
    let (sink, diagnostics) = ChannelSink::channel();
    let coordinator = Coordinator::new(config(executor), &metrics)
        .unwrap()
        .with_diagnostics(Arc::new(sink));
    (coordinator, diagnostics, metrics)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub const IDLE: Duration = Duration::from_secs(5);

/// A loader that records the sources it was asked for and fails the ones
/// listed in `failing`.
pub struct StubLoader {
    kind: DependencyKind,
    failing: HashSet<String>,
    delay: Option<Duration>,
    panics: bool,
    calls: Mutex<Vec<String>>,
}

impl StubLoader {
    pub fn new(kind: DependencyKind) -> Self {
        Self {
            kind,
            failing: HashSet::new(),
            delay: None,
            panics: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, source: &str) -> Self {
        self.failing.insert(source.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, source: &str) -> usize {
        self.calls().iter().filter(|call| *call == source).count()
    }
}

impl ResourceLoader for StubLoader {
    fn kind(&self) -> DependencyKind {
        self.kind
    }

    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.calls.lock().unwrap().push(request.source.clone());
        if self.panics {
            panic!("stub loader asked to panic");
        }
        if self.failing.contains(&request.source) {
            return Err(format!("{} is unavailable", request.source).into());
        }

        Ok(match self.kind {
            DependencyKind::Script => LoadedValue::Script,
            DependencyKind::Stylesheet => LoadedValue::Stylesheet,
            DependencyKind::Text => LoadedValue::Text(Arc::from(request.source.as_str())),
            _ => LoadedValue::Image(Arc::new(ImageData {
                width: 1,
                height: 1,
                pixels: vec![0; 4],
            })),
        })
    }
}
