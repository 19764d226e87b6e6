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

use std::path::PathBuf;
use tether_telemetry::MetricsError;
use thiserror::Error;

/// Errors raised while building or driving a [`Coordinator`](crate::Coordinator).
///
/// Load failures and syntax errors are not among them; those are reported as
/// diagnostics.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The configuration could not be parsed or serialized.
    #[error("Invalid coordinator configuration: {0}")]
    Config(String),
    /// The configuration file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A metric could not be registered.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    /// The load executor could not start its threads.
    #[error("Failed to start the load executor: {0}")]
    Executor(#[source] std::io::Error),
    /// `run_until_idle` gave up while loads were still running.
    #[error("Timed out with {in_flight} load(s) still in flight")]
    Timeout {
        /// Loads that had not reported back.
        in_flight: usize,
    },
}
