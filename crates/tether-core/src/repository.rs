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

//! Mapping of short repository names to base locations.

use crate::dependency::ModulePath;
use std::collections::HashMap;

/// Name of the repository registered by [`RepositoryMap::with_default`].
pub const DEFAULT_REPOSITORY_NAME: &str = "opensource";

/// Base location of the default repository.
pub const DEFAULT_REPOSITORY_URI: &str =
    "https://assets.peppermintcloud.com.au/simpleui/repositories";

/// Resolves module paths such as `opensource.widgets.button` into source
/// locations such as `<base>/widgets/button.js`.
#[derive(Debug, Clone, Default)]
pub struct RepositoryMap {
    bases: HashMap<String, String>,
}

impl RepositoryMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding only the built-in default repository.
    pub fn with_default() -> Self {
        let mut map = Self::new();
        map.add(DEFAULT_REPOSITORY_NAME, DEFAULT_REPOSITORY_URI);
        map
    }

    /// Registers (or replaces) a repository. Trailing `/` on the base is ignored.
    pub fn add(&mut self, name: impl Into<String>, base_uri: impl Into<String>) {
        let base_uri = base_uri.into();
        let base_uri = base_uri.trim_end_matches('/').to_string();
        self.bases.insert(name.into(), base_uri);
    }

    /// Returns the base location registered under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bases.get(name).map(String::as_str)
    }

    /// Returns `true` if a repository with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.bases.contains_key(name)
    }

    /// Number of registered repositories.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns `true` if no repository is registered.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Resolves a module path into a source location, appending `extension`.
    ///
    /// A module whose repository is unknown resolves to its relative path
    /// alone, which lets a local byte source still find it. No leading `/`
    /// is emitted, so the location stays relative to the source's root.
    pub fn resolve(&self, module: &ModulePath, extension: &str) -> String {
        let relative = module.relative_path();
        match self.get(module.repository()) {
            Some(base) => format!("{base}/{relative}{extension}"),
            None => {
                log::warn!(
                    "Repository '{}' is not registered; resolving '{}' as a relative path",
                    module.repository(),
                    module
                );
                format!("{relative}{extension}")
            }
        }
    }
}
