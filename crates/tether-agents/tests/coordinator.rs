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
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tether_agents::{CoordinatorConfig, ExecutorConfig};
use tether_core::{DependencyKind, Diagnostic, DescriptorError, LoadType};
use tether_data::ResourceStatus;
use tether_lanes::{MemorySource, RecordingHost};

// --- Scenarios ---

#[test]
fn script_resolves_through_repository_and_completes_once() -> Result<()> {
    let source = Arc::new(MemorySource::new().with("https://host/repo/foo.js", "init();"));
    let host = Arc::new(RecordingHost::new());
    let (coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    let mut coordinator = coordinator.with_standard_lanes(source.clone(), host.clone());

    let (calls, callback) = recorder();
    let id = coordinator.require(["opensource.foo"], callback, LoadType::Async);
    assert!(coordinator.is_pending(&id));

    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 1);
    assert!(calls.lock().unwrap()[0].is_empty());
    assert_eq!(source.fetch_count("https://host/repo/foo.js"), 1);
    assert_eq!(host.script_source("opensource.foo").as_deref(), Some("init();"));
    assert_eq!(coordinator.status("opensource.foo"), Some(ResourceStatus::Loaded));
    assert!(!coordinator.is_pending(&id));
    Ok(())
}

#[test]
fn shared_image_is_loaded_once_for_every_request() -> Result<()> {
    let source = Arc::new(MemorySource::new().with("a.png", png_bytes(4, 3)));
    let (coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    let mut coordinator =
        coordinator.with_standard_lanes(source.clone(), Arc::new(RecordingHost::new()));

    let descriptors = ["fileReader.image('a.png')", "fileReader.image('a.png')"];
    let (first, first_callback) = recorder();
    let (second, second_callback) = recorder();
    coordinator.require(descriptors, first_callback, LoadType::Async);
    coordinator.require(descriptors, second_callback, LoadType::Async);

    assert_eq!(coordinator.run_until_idle(IDLE)?, 2);

    assert_eq!(source.fetch_count("a.png"), 1);
    assert_eq!(coordinator.tracked_resources(), 1);
    for calls in [&first, &second] {
        assert_eq!(call_count(calls), 1);
        let resolved = &calls.lock().unwrap()[0];
        let image = resolved
            .image("fileReader.image('a.png')")
            .expect("image is delivered under its key");
        assert_eq!((image.width, image.height), (4, 3));
    }
    Ok(())
}

#[test]
fn failed_dependency_stalls_the_request() -> Result<()> {
    let scripts = Arc::new(
        StubLoader::new(DependencyKind::Script).failing("https://host/repo/bad.js"),
    );
    let texts = Arc::new(StubLoader::new(DependencyKind::Text));
    let (mut coordinator, diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(scripts.clone());
    coordinator.register_loader(texts.clone());

    let (calls, callback) = recorder();
    let id = coordinator.require(
        ["opensource.bad", "fileReader.text('t.txt')"],
        callback,
        LoadType::Async,
    );
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 0);
    assert!(coordinator.is_pending(&id));
    assert_eq!(coordinator.status("opensource.bad"), Some(ResourceStatus::Failed));
    assert_eq!(
        coordinator.status("fileReader.text('t.txt')"),
        Some(ResourceStatus::Loaded)
    );

    match diagnostics.try_recv()? {
        Diagnostic::LoadFailed { key, source, error } => {
            assert_eq!(key.as_str(), "opensource.bad");
            assert_eq!(source, "https://host/repo/bad.js");
            assert!(error.contains("unavailable"));
        }
        other => panic!("unexpected diagnostic {other:?}"),
    }

    let status = coordinator.report_status();
    assert!(status.is_stalled);
    assert_eq!(status.failed_resources, 1);
    assert!(status.health_score < 1.0);
    Ok(())
}

#[test]
fn unknown_object_kind_is_a_syntax_error() -> Result<()> {
    let (mut coordinator, diagnostics, metrics) = coordinator(ExecutorConfig::Inline);

    let (calls, callback) = recorder();
    let id = coordinator.require(["fileReader.unknown(x)"], callback, LoadType::Async);
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 0);
    assert!(coordinator.is_pending(&id));
    assert_eq!(coordinator.tracked_resources(), 0);
    assert_eq!(
        diagnostics.try_recv()?,
        Diagnostic::Syntax {
            descriptor: "fileReader.unknown(x)".to_string(),
            error: DescriptorError::UnknownKind {
                kind: "unknown".to_string()
            },
        }
    );

    let syntax_errors = metrics.register_counter("requests", "syntax_errors_total", "")?;
    assert_eq!(syntax_errors.get()?, 1);
    Ok(())
}

// --- Properties ---

#[test]
fn cached_dependencies_complete_during_require() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text));
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts.clone());

    let (first, callback) = recorder();
    coordinator.require_one("fileReader.text('readme.txt')", callback);
    coordinator.run_until_idle(IDLE)?;
    assert_eq!(call_count(&first), 1);

    let (second, callback) = recorder();
    let id = coordinator.require_one("fileReader.text('readme.txt')", callback);

    assert_eq!(call_count(&second), 1);
    assert!(!coordinator.is_pending(&id));
    assert_eq!(texts.calls_for("readme.txt"), 1);
    assert_eq!(
        second.lock().unwrap()[0].text("fileReader.text('readme.txt')"),
        Some("readme.txt")
    );
    Ok(())
}

#[test]
fn empty_request_completes_immediately() {
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);

    let (calls, callback) = recorder();
    let id = coordinator.require(Vec::<String>::new(), callback, LoadType::Async);

    assert_eq!(call_count(&calls), 1);
    assert!(!coordinator.is_pending(&id));
}

#[test]
fn remove_waiter_is_idempotent_and_prevents_completion() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text));
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts);

    let (calls, callback) = recorder();
    let id = coordinator.require_one("fileReader.text('x.txt')", callback);

    assert!(coordinator.remove_waiter(&id));
    assert!(!coordinator.remove_waiter(&id));
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 0);
    assert_eq!(coordinator.pending_requests(), 0);
    let entry = coordinator
        .entry("fileReader.text('x.txt')")
        .expect("resource stays tracked");
    assert_eq!(entry.status(), ResourceStatus::Loaded);
    assert!(entry.waiters().is_empty());
    Ok(())
}

#[test]
fn disjoint_requests_progress_independently() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text).failing("broken.txt"));
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts);

    let (stalled, callback) = recorder();
    coordinator.require_one("fileReader.text('broken.txt')", callback);
    let (healthy, callback) = recorder();
    coordinator.require(
        ["fileReader.text('a.txt')", "fileReader.text('b.txt')"],
        callback,
        LoadType::Async,
    );
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&stalled), 0);
    assert_eq!(call_count(&healthy), 1);
    assert_eq!(healthy.lock().unwrap()[0].len(), 2);
    assert_eq!(coordinator.pending_requests(), 1);
    Ok(())
}

#[test]
fn fonts_and_audio_are_delivered_under_logical_names() -> Result<()> {
    let mut font = b"wOF2".to_vec();
    font.extend_from_slice(&[0; 12]);
    let source = Arc::new(MemorySource::new().with("fonts/inter.woff2", font));
    let (coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    let mut coordinator = coordinator.with_standard_lanes(source, Arc::new(RecordingHost::new()));

    let (calls, callback) = recorder();
    coordinator.require(
        [
            "fileReader.fontFace('Inter', 'fonts/inter.woff2')",
            "fileReader.audio('sfx/click.ogg')",
        ],
        callback,
        LoadType::Async,
    );

    // Audio is immediate and settled before `require` returns.
    assert_eq!(
        coordinator.status("fileReader.audio('sfx/click.ogg')"),
        Some(ResourceStatus::Loaded)
    );
    assert_eq!(coordinator.in_flight(), 1);

    coordinator.run_until_idle(IDLE)?;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].font("Inter").map(|face| face.family.as_str()), Some("Inter"));
    assert_eq!(
        calls[0].audio("click.ogg").map(|clip| clip.source.as_str()),
        Some("sfx/click.ogg")
    );
    Ok(())
}

#[test]
fn missing_loader_fails_the_resource() -> Result<()> {
    let (mut coordinator, diagnostics, metrics) = coordinator(ExecutorConfig::Inline);
    assert!(!coordinator.has_loader(DependencyKind::Image));

    let (calls, callback) = recorder();
    coordinator.require_one("fileReader.image('logo.png')", callback);
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 0);
    assert_eq!(
        coordinator.status("fileReader.image('logo.png')"),
        Some(ResourceStatus::Failed)
    );
    assert!(matches!(
        diagnostics.try_recv()?,
        Diagnostic::LoadFailed { .. }
    ));
    let failed = metrics.register_counter("loads", "loads_failed_total", "")?;
    assert_eq!(failed.get()?, 1);
    Ok(())
}

#[test]
fn panicking_loader_is_reported_as_failure() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text).panicking());
    let (mut coordinator, diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts);

    coordinator.require_one("fileReader.text('boom.txt')", |_| {});
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(coordinator.in_flight(), 0);
    assert_eq!(
        coordinator.status("fileReader.text('boom.txt')"),
        Some(ResourceStatus::Failed)
    );
    assert!(diagnostics.try_recv().is_ok());
    Ok(())
}

#[test]
fn callback_panic_leaves_later_events_queued() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text));
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts.clone());

    coordinator.require_one("fileReader.text('a.txt')", |_| panic!("callback failed"));
    let (calls, callback) = recorder();
    let second = coordinator.require_one("fileReader.text('b.txt')", callback);
    assert_eq!(coordinator.in_flight(), 2);

    // --- The first callback unwinds out of update ---
    let outcome = catch_unwind(AssertUnwindSafe(|| coordinator.update()));
    assert!(outcome.is_err());
    assert_eq!(coordinator.in_flight(), 1);
    assert_eq!(
        coordinator.status("fileReader.text('a.txt')"),
        Some(ResourceStatus::Loaded)
    );

    // --- The second outcome is still applied afterwards ---
    coordinator.run_until_idle(IDLE)?;
    assert_eq!(coordinator.in_flight(), 0);
    assert_eq!(
        coordinator.status("fileReader.text('b.txt')"),
        Some(ResourceStatus::Loaded)
    );
    assert_eq!(call_count(&calls), 1);
    assert!(!coordinator.is_pending(&second));
    assert_eq!(texts.calls_for("b.txt"), 1);
    Ok(())
}

#[test]
fn failed_resource_is_never_retried() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text).failing("broken.txt"));
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts.clone());

    let (first_calls, first_callback) = recorder();
    let first = coordinator.require_one("fileReader.text('broken.txt')", first_callback);
    coordinator.run_until_idle(IDLE)?;

    let (second_calls, second_callback) = recorder();
    let second = coordinator.require_one("fileReader.text('broken.txt')", second_callback);
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(texts.calls_for("broken.txt"), 1);
    assert!(coordinator.is_pending(&first));
    assert!(coordinator.is_pending(&second));
    assert_eq!(coordinator.in_flight(), 0);
    assert_eq!(call_count(&first_calls), 0);
    assert_eq!(call_count(&second_calls), 0);
    assert_eq!(
        coordinator.status("fileReader.text('broken.txt')"),
        Some(ResourceStatus::Failed)
    );
    Ok(())
}

#[test]
fn stylesheets_are_deduplicated_and_distinct_from_scripts() -> Result<()> {
    let source = Arc::new(
        MemorySource::new()
            .with("https://host/repo/theme.css", "body {}")
            .with("https://host/repo/theme.js", "theme();"),
    );
    let host = Arc::new(RecordingHost::new());
    let (coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    let mut coordinator = coordinator.with_standard_lanes(source.clone(), host.clone());

    let key = coordinator.add_stylesheet("opensource.theme")?;
    assert_eq!(key.as_str(), "stylesheet:opensource.theme");
    coordinator.add_stylesheet("opensource.theme")?;
    coordinator.require_one("opensource.theme", |_| {});
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(source.fetch_count("https://host/repo/theme.css"), 1);
    assert_eq!(coordinator.tracked_resources(), 2);
    assert_eq!(host.stylesheets(), vec![key]);
    assert_eq!(coordinator.status("opensource.theme"), Some(ResourceStatus::Loaded));
    Ok(())
}

#[test]
fn invalid_stylesheet_module_is_rejected() {
    let (mut coordinator, diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);

    assert!(coordinator.add_stylesheet("lonely").is_err());
    assert!(matches!(
        diagnostics.try_recv(),
        Ok(Diagnostic::Syntax { .. })
    ));
    assert_eq!(coordinator.tracked_resources(), 0);
}

#[test]
fn completion_metrics_track_requests() -> Result<()> {
    let texts = Arc::new(StubLoader::new(DependencyKind::Text));
    let (mut coordinator, _diagnostics, metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(texts);

    coordinator.require_one("fileReader.text('one.txt')", |_| {});
    coordinator.require_one("fileReader.text('two.txt')", |_| {});

    let pending = metrics.register_gauge("requests", "pending_requests", "", "requests")?;
    assert_eq!(pending.get()?, 2.0);

    coordinator.run_until_idle(IDLE)?;

    let completed = metrics.register_counter("requests", "requests_completed_total", "")?;
    let started = metrics.register_counter("loads", "loads_started_total", "")?;
    assert_eq!(completed.get()?, 2);
    assert_eq!(started.get()?, 2);
    assert_eq!(pending.get()?, 0.0);
    assert!(metrics.to_json()?.contains("load_time"));
    Ok(())
}

// --- Configuration ---

#[test]
fn ron_configuration_drives_resolution_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("modules/widgets"))?;
    std::fs::write(dir.path().join("modules/widgets/button.js"), "button();")?;
    let config_path = dir.path().join("tether.ron");
    std::fs::write(
        &config_path,
        r#"(
            repositories: { "local": "file:///modules" },
            executor: Inline,
        )"#,
    )?;

    let config = CoordinatorConfig::load(&config_path)?;
    let metrics = tether_telemetry::MetricsRegistry::new();
    let host = Arc::new(RecordingHost::new());
    let mut coordinator = tether_agents::Coordinator::new(config, &metrics)?.with_standard_lanes(
        Arc::new(tether_lanes::FileSystemSource::new(dir.path())),
        host.clone(),
    );

    let (calls, callback) = recorder();
    coordinator.require_one("local.widgets.button", callback);
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(call_count(&calls), 1);
    assert_eq!(
        host.script_source("local.widgets.button").as_deref(),
        Some("button();")
    );
    Ok(())
}

#[test]
fn add_repository_overrides_the_mapping() -> Result<()> {
    let scripts = Arc::new(StubLoader::new(DependencyKind::Script));
    let (mut coordinator, _diagnostics, _metrics) = coordinator(ExecutorConfig::Inline);
    coordinator.register_loader(scripts.clone());

    coordinator.add_repository("opensource", "https://mirror/repo/");
    coordinator.require_one("opensource.widgets.list", |_| {});
    coordinator.run_until_idle(IDLE)?;

    assert_eq!(scripts.calls(), vec!["https://mirror/repo/widgets/list.js"]);
    Ok(())
}
