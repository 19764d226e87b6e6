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

use super::ByteSource;
use crate::error::FetchError;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serves locations from a directory on disk.
///
/// Plain paths and `file://` URLs are resolved below `root`; other schemes
/// are rejected, as are paths climbing out of the root with `..`.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory locations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a location to the file it refers to.
    pub fn path_for(&self, location: &str) -> Result<PathBuf, FetchError> {
        let relative = match location.strip_prefix("file://") {
            Some(rest) => rest,
            None if location.contains("://") => {
                return Err(FetchError::UnsupportedScheme {
                    location: location.to_string(),
                })
            }
            None => location,
        };
        let relative = Path::new(relative.trim_start_matches('/'));

        if relative
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(FetchError::OutsideRoot {
                location: location.to_string(),
            });
        }

        Ok(self.root.join(relative))
    }
}

impl ByteSource for FileSystemSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.path_for(location)?;
        log::debug!("Reading '{}' from {}", location, path.display());

        std::fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                location: location.to_string(),
            },
            _ => FetchError::Io {
                location: location.to_string(),
                source,
            },
        })
    }
}
