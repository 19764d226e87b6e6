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

//! Coordinator configuration, stored as RON.

use crate::error::CoordinatorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tether_core::repository::{DEFAULT_REPOSITORY_NAME, DEFAULT_REPOSITORY_URI};
use tether_core::RepositoryMap;

/// Which [`LoadExecutor`](crate::LoadExecutor) the coordinator builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutorConfig {
    /// Run every load on the thread that dispatches it.
    Inline,
    /// Run loads on background threads.
    Threaded {
        /// Upper bound on concurrently running asynchronous loads.
        workers: usize,
    },
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::Threaded { workers: 4 }
    }
}

/// Settings of a [`Coordinator`](crate::Coordinator).
///
/// Every field has a default, so a RON file only needs to name what it
/// changes:
///
/// ```text
/// (
///     repositories: { "local": "file:///modules" },
///     executor: Inline,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Repository name to base URI. Added on top of the default repository.
    pub repositories: BTreeMap<String, String>,
    /// Appended to resolved script paths.
    pub script_extension: String,
    /// Appended to resolved stylesheet paths.
    pub stylesheet_extension: String,
    /// Where loads run.
    pub executor: ExecutorConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            repositories: BTreeMap::from([(
                DEFAULT_REPOSITORY_NAME.to_string(),
                DEFAULT_REPOSITORY_URI.to_string(),
            )]),
            script_extension: ".js".to_string(),
            stylesheet_extension: ".css".to_string(),
            executor: ExecutorConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, CoordinatorError> {
        ron::from_str(text).map_err(|e| CoordinatorError::Config(e.to_string()))
    }

    /// Reads and parses a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoordinatorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoordinatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded coordinator configuration from {}", path.display());
        Self::from_ron_str(&text)
    }

    /// Serializes the configuration as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, CoordinatorError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .map_err(|e| CoordinatorError::Config(e.to_string()))
    }

    /// Builds the repository map: the default repository plus every
    /// configured one, later entries overriding earlier ones.
    pub fn repository_map(&self) -> RepositoryMap {
        let mut map = RepositoryMap::with_default();
        for (name, base_uri) in &self.repositories {
            map.add(name.clone(), base_uri.clone());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_the_default_repository() {
        let config = CoordinatorConfig::default();
        let map = config.repository_map();

        assert_eq!(map.get(DEFAULT_REPOSITORY_NAME), Some(DEFAULT_REPOSITORY_URI));
        assert_eq!(config.script_extension, ".js");
        assert_eq!(config.stylesheet_extension, ".css");
    }

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let config = CoordinatorConfig::from_ron_str(
            r#"(
                repositories: { "local": "file:///modules" },
                executor: Inline,
            )"#,
        )
        .unwrap();

        assert_eq!(config.executor, ExecutorConfig::Inline);
        assert_eq!(config.script_extension, ".js");

        let map = config.repository_map();
        assert_eq!(map.get("local"), Some("file:///modules"));
        assert!(map.contains(DEFAULT_REPOSITORY_NAME));
    }

    #[test]
    fn survives_a_ron_round_trip() {
        let config = CoordinatorConfig {
            executor: ExecutorConfig::Threaded { workers: 2 },
            ..Default::default()
        };

        let text = config.to_ron_string().unwrap();
        assert_eq!(CoordinatorConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn invalid_ron_is_a_config_error() {
        let error = CoordinatorConfig::from_ron_str("(executor: Sideways)").unwrap_err();
        assert!(matches!(error, CoordinatorError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = CoordinatorConfig::load(dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(error, CoordinatorError::Io { .. }));
    }
}
