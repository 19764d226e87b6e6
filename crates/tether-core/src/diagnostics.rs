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

//! Out-of-band reporting of syntax errors and load failures.
//!
//! Failures never reach the caller of `require` or its callback; they are
//! delivered to a [`DiagnosticSink`] instead.

use crate::dependency::{DependencyKey, DescriptorError};
use std::fmt;

/// A problem reported by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A descriptor did not match the grammar and was dropped.
    Syntax {
        /// The descriptor as written by the caller.
        descriptor: String,
        /// Why it was rejected.
        error: DescriptorError,
    },
    /// A loader reported failure; the resource is failed for good.
    LoadFailed {
        /// The resource that failed.
        key: DependencyKey,
        /// The location it was loaded from.
        source: String,
        /// The rendered loader error.
        error: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Syntax { descriptor, error } => {
                write!(f, "'{descriptor}' has invalid syntax: {error}")
            }
            Diagnostic::LoadFailed { key, source, error } => {
                write!(f, "'{key}' failed to load from '{source}': {error}")
            }
        }
    }
}

/// Receives diagnostics from the coordinator.
pub trait DiagnosticSink: Send + Sync {
    /// Handles one diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Writes diagnostics to the `log` facade at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: &Diagnostic) {
        log::error!("[tether] {diagnostic}");
    }
}

/// Forwards diagnostics into a flume channel, and to the log.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: flume::Sender<Diagnostic>,
}

impl ChannelSink {
    /// Creates a sink together with the receiver its diagnostics arrive on.
    pub fn channel() -> (Self, flume::Receiver<Diagnostic>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }
}

impl DiagnosticSink for ChannelSink {
    fn report(&self, diagnostic: &Diagnostic) {
        LogSink.report(diagnostic);
        if self.sender.send(diagnostic.clone()).is_err() {
            log::trace!("Diagnostic receiver dropped.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_forwards_diagnostics() {
        let (sink, receiver) = ChannelSink::channel();
        let diagnostic = Diagnostic::LoadFailed {
            key: DependencyKey::from("opensource.bad"),
            source: "https://host/bad.js".to_string(),
            error: "not found".to_string(),
        };

        sink.report(&diagnostic);

        assert_eq!(receiver.try_recv().unwrap(), diagnostic);
    }

    #[test]
    fn display_names_the_descriptor() {
        let diagnostic = Diagnostic::Syntax {
            descriptor: "fileReader.unknown(x)".to_string(),
            error: DescriptorError::UnknownKind {
                kind: "unknown".to_string(),
            },
        };
        let rendered = diagnostic.to_string();
        assert!(rendered.contains("fileReader.unknown(x)"));
        assert!(rendered.contains("unknown"));
    }
}
