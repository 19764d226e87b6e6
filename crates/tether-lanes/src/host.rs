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

//! The environment scripts and stylesheets are handed to once fetched.

use std::sync::Mutex;
use tether_core::DependencyKey;

/// Receives fetched scripts and stylesheets.
///
/// The coordinator only cares whether the host accepted the resource; what
/// "executing" or "applying" means is up to the embedder.
pub trait ScriptHost: Send + Sync {
    /// Executes a script module.
    fn execute_script(&self, key: &DependencyKey, source: &str) -> Result<(), String>;

    /// Applies a stylesheet.
    fn apply_stylesheet(&self, key: &DependencyKey, css: &str) -> Result<(), String>;
}

/// A host that records what it was given, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    scripts: Mutex<Vec<(DependencyKey, String)>>,
    stylesheets: Mutex<Vec<(DependencyKey, String)>>,
}

impl RecordingHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of the scripts executed so far.
    pub fn scripts(&self) -> Vec<DependencyKey> {
        self.scripts
            .lock()
            .map(|scripts| scripts.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }

    /// Source of an executed script.
    pub fn script_source(&self, key: &str) -> Option<String> {
        let scripts = self.scripts.lock().ok()?;
        scripts
            .iter()
            .find(|(recorded, _)| recorded.as_str() == key)
            .map(|(_, source)| source.clone())
    }

    /// Keys of the stylesheets applied so far.
    pub fn stylesheets(&self) -> Vec<DependencyKey> {
        self.stylesheets
            .lock()
            .map(|sheets| sheets.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }
}

impl ScriptHost for RecordingHost {
    fn execute_script(&self, key: &DependencyKey, source: &str) -> Result<(), String> {
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|_| "script log is poisoned".to_string())?;
        scripts.push((key.clone(), source.to_string()));
        Ok(())
    }

    fn apply_stylesheet(&self, key: &DependencyKey, css: &str) -> Result<(), String> {
        let mut sheets = self
            .stylesheets
            .lock()
            .map_err(|_| "stylesheet log is poisoned".to_string())?;
        sheets.push((key.clone(), css.to_string()));
        Ok(())
    }
}
