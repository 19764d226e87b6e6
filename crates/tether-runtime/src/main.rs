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

//! `tether`: requires a set of descriptors against a local directory and
//! reports what they resolved to.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tether_agents::{Coordinator, CoordinatorConfig};
use tether_core::{LoadType, LoadedValue, ResolvedDependencies};
use tether_lanes::{FileSystemSource, RecordingHost};
use tether_telemetry::MetricsRegistry;

#[derive(Parser, Debug)]
#[command(
    name = "tether",
    version,
    about = "Resolves dependency descriptors against a local asset directory"
)]
struct Cli {
    /// Descriptors to require, e.g. `local.widgets.button` or `fileReader.text('notes.txt')`
    #[arg(value_name = "DESCRIPTOR", required = true)]
    descriptors: Vec<String>,

    /// RON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory plain paths and `file://` URLs are read from
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Seconds to wait for loads to settle
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Load dependencies one after another, in declaration order
    #[arg(long)]
    synchronous: bool,

    /// Include a metrics snapshot in the report
    #[arg(long)]
    metrics: bool,
}

#[derive(Serialize)]
struct ValueReport {
    name: String,
    kind: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct Report {
    completed: bool,
    values: Vec<ValueReport>,
    scripts_executed: Vec<String>,
    stylesheets_applied: Vec<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<serde_json::Value>,
}

fn describe(name: &str, value: &LoadedValue) -> ValueReport {
    let (kind, detail) = match value {
        LoadedValue::Script => ("script", String::new()),
        LoadedValue::Stylesheet => ("stylesheet", String::new()),
        LoadedValue::Image(image) => ("image", format!("{}x{} RGBA8", image.width, image.height)),
        LoadedValue::Text(text) => ("text", format!("{} bytes", text.len())),
        LoadedValue::Font(face) => ("fontFace", format!("{} from {}", face.family, face.source)),
        LoadedValue::Audio(clip) => ("audio", clip.source.clone()),
    };
    ValueReport {
        name: name.to_string(),
        kind,
        detail,
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CoordinatorConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => CoordinatorConfig::default(),
    };

    let metrics = MetricsRegistry::new();
    let host = Arc::new(RecordingHost::new());
    let mut coordinator = Coordinator::new(config, &metrics)
        .context("Failed to start the coordinator")?
        .with_standard_lanes(Arc::new(FileSystemSource::new(&cli.root)), host.clone());
    log::info!(
        "Coordinator started on {} with {} descriptor(s)",
        cli.root.display(),
        cli.descriptors.len()
    );

    let resolved: Arc<Mutex<Option<ResolvedDependencies>>> = Arc::default();
    let slot = resolved.clone();
    let load_type = if cli.synchronous {
        LoadType::Synchronous
    } else {
        LoadType::Async
    };
    let id = coordinator.require(
        &cli.descriptors,
        move |values| {
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(values);
            }
        },
        load_type,
    );

    let fired = coordinator
        .run_until_idle(Duration::from_secs(cli.timeout))
        .context("Loads did not settle")?;
    log::info!("Loads settled; {fired} callback(s) fired");

    let values = match resolved.lock() {
        Ok(slot) => slot
            .as_ref()
            .map(|values| {
                let mut reports: Vec<_> = values
                    .iter()
                    .map(|(name, value)| describe(name, value))
                    .collect();
                reports.sort_by(|a, b| a.name.cmp(&b.name));
                reports
            })
            .unwrap_or_default(),
        Err(_) => bail!("Callback state is poisoned"),
    };

    let report = Report {
        completed: !coordinator.is_pending(&id),
        values,
        scripts_executed: host.scripts().iter().map(ToString::to_string).collect(),
        stylesheets_applied: host.stylesheets().iter().map(ToString::to_string).collect(),
        status: coordinator.report_status().message,
        metrics: if cli.metrics {
            Some(serde_json::from_str(&metrics.to_json()?)?)
        } else {
            None
        },
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    log::info!("Report written ({} value(s))", report.values.len());

    if !report.completed {
        bail!("Request {id} did not complete; see the diagnostics above");
    }
    Ok(())
}
