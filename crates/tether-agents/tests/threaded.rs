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

mod common;

use anyhow::Result;
use common::*;
use std::sync::Arc;
use std::time::Duration;
use tether_agents::{CoordinatorError, ExecutorConfig};
use tether_core::{DependencyKind, LoadType};
use tether_data::ResourceStatus;

#[test]
fn concurrent_requests_share_one_load_per_key() -> Result<()> {
    let texts = Arc::new(
        StubLoader::new(DependencyKind::Text).with_delay(Duration::from_millis(5)),
    );
    let (mut coordinator, _diagnostics, _metrics) =
        coordinator(ExecutorConfig::Threaded { workers: 4 });
    coordinator.register_loader(texts.clone());

    let mut logs = Vec::new();
    for i in 0..10 {
        let (calls, callback) = recorder();
        let own = format!("fileReader.text('own-{i}.txt')");
        coordinator.require(
            ["fileReader.text('shared.txt')".to_string(), own],
            callback,
            LoadType::Async,
        );
        logs.push(calls);
    }

    let fired = coordinator.run_until_idle(IDLE)?;

    assert_eq!(fired, 10);
    assert_eq!(texts.calls_for("shared.txt"), 1);
    assert_eq!(texts.calls().len(), 11);
    for calls in &logs {
        assert_eq!(call_count(calls), 1);
        assert_eq!(calls.lock().unwrap()[0].len(), 2);
    }
    assert_eq!(coordinator.pending_requests(), 0);
    Ok(())
}

#[test]
fn synchronous_loads_run_in_declaration_order() -> Result<()> {
    let scripts = Arc::new(
        StubLoader::new(DependencyKind::Script).with_delay(Duration::from_millis(2)),
    );
    let (mut coordinator, _diagnostics, _metrics) =
        coordinator(ExecutorConfig::Threaded { workers: 4 });
    coordinator.register_loader(scripts.clone());

    let modules = ["opensource.a", "opensource.b", "opensource.c", "opensource.d"];
    let (calls, callback) = recorder();
    coordinator.require(modules, callback, LoadType::Synchronous);
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 1);
    assert_eq!(
        scripts.calls(),
        vec![
            "https://host/repo/a.js",
            "https://host/repo/b.js",
            "https://host/repo/c.js",
            "https://host/repo/d.js",
        ]
    );
    Ok(())
}

#[test]
fn update_is_non_blocking() -> Result<()> {
    let texts = Arc::new(
        StubLoader::new(DependencyKind::Text).with_delay(Duration::from_millis(50)),
    );
    let (mut coordinator, _diagnostics, _metrics) =
        coordinator(ExecutorConfig::Threaded { workers: 1 });
    coordinator.register_loader(texts);

    let (calls, callback) = recorder();
    coordinator.require_one("fileReader.text('slow.txt')", callback);

    assert_eq!(coordinator.update(), 0);
    assert_eq!(coordinator.in_flight(), 1);
    assert_eq!(
        coordinator.status("fileReader.text('slow.txt')"),
        Some(ResourceStatus::Pending)
    );

    coordinator.run_until_idle(IDLE)?;
    assert_eq!(call_count(&calls), 1);
    Ok(())
}

#[test]
fn run_until_idle_times_out_on_slow_loads() {
    let texts = Arc::new(
        StubLoader::new(DependencyKind::Text).with_delay(Duration::from_millis(500)),
    );
    let (mut coordinator, _diagnostics, _metrics) =
        coordinator(ExecutorConfig::Threaded { workers: 1 });
    coordinator.register_loader(texts);

    coordinator.require_one("fileReader.text('glacial.txt')", |_| {});
    let result = coordinator.run_until_idle(Duration::from_millis(10));

    assert!(matches!(
        result,
        Err(CoordinatorError::Timeout { in_flight: 1 })
    ));
}
