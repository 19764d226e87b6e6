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
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// An in-memory byte source, pre-populated by the embedder.
///
/// It also counts fetches per location, which makes it handy for checking
/// that a resource is only fetched once.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<HashMap<String, Vec<u8>>>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the bytes served at `location`.
    pub fn insert(&self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(location.into(), bytes.into());
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }

    /// Number of times `location` was fetched, found or not.
    pub fn fetch_count(&self, location: &str) -> usize {
        self.fetches
            .lock()
            .map(|fetches| fetches.get(location).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl ByteSource for MemorySource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(location.to_string()).or_insert(0) += 1;
        }

        self.files
            .read()
            .ok()
            .and_then(|files| files.get(location).cloned())
            .ok_or_else(|| FetchError::NotFound {
                location: location.to_string(),
            })
    }
}
