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

//! The table of pending `require` calls.

use crate::registry::ResourceSpec;
use ahash::AHashMap;
use std::fmt;
use tether_core::{DependencyKey, DependencyKind, LoadType, RequestId, ResolvedDependencies};

/// The function invoked once a request is satisfied. `FnOnce`, so it can
/// only ever run once.
pub type CompletionCallback = Box<dyn FnOnce(ResolvedDependencies) + Send + 'static>;

/// What a `require` call resolved to before it is registered.
#[derive(Debug, Clone, Default)]
pub struct RequestPlan {
    /// Identity of the request.
    pub id: RequestId,
    /// Scheduling hint.
    pub load_type: LoadType,
    /// Dependencies that parsed, in declaration order.
    pub dependencies: Vec<ResourceSpec>,
    /// Descriptors that failed to parse.
    pub rejected: Vec<String>,
}

/// One caller's dependency set and completion callback.
pub struct RequestEntry {
    id: RequestId,
    package_keys: Vec<DependencyKey>,
    object_keys: Vec<DependencyKey>,
    rejected: Vec<String>,
    callback: CompletionCallback,
    load_type: LoadType,
}

impl RequestEntry {
    /// Creates an entry with no dependencies.
    pub fn new(id: RequestId, callback: CompletionCallback, load_type: LoadType) -> Self {
        Self {
            id,
            package_keys: Vec::new(),
            object_keys: Vec::new(),
            rejected: Vec::new(),
            callback,
            load_type,
        }
    }

    /// Records a dependency, keeping declaration order and dropping duplicates.
    pub fn add_dependency(&mut self, key: DependencyKey, kind: DependencyKind) {
        let keys = if kind.is_object() {
            &mut self.object_keys
        } else {
            &mut self.package_keys
        };
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Records a descriptor that failed to parse. Such a request can never be
    /// satisfied.
    pub fn reject(&mut self, descriptor: impl Into<String>) {
        self.rejected.push(descriptor.into());
    }

    /// Identity of the request.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Script-like dependencies.
    pub fn package_keys(&self) -> &[DependencyKey] {
        &self.package_keys
    }

    /// Object-like dependencies.
    pub fn object_keys(&self) -> &[DependencyKey] {
        &self.object_keys
    }

    /// Every dependency, packages first.
    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyKey> {
        self.package_keys.iter().chain(self.object_keys.iter())
    }

    /// Descriptors that failed to parse.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Scheduling hint.
    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    /// Consumes the entry, returning its callback.
    pub fn into_callback(self) -> CompletionCallback {
        self.callback
    }
}

impl fmt::Debug for RequestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEntry")
            .field("id", &self.id)
            .field("package_keys", &self.package_keys)
            .field("object_keys", &self.object_keys)
            .field("rejected", &self.rejected)
            .field("load_type", &self.load_type)
            .finish_non_exhaustive()
    }
}

/// One entry per pending request.
#[derive(Debug, Default)]
pub struct RequestTable {
    entries: AHashMap<RequestId, RequestEntry>,
}

impl RequestTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the one it replaced.
    pub fn insert(&mut self, entry: RequestEntry) -> Option<RequestEntry> {
        self.entries.insert(entry.id, entry)
    }

    /// Returns the entry for `id`.
    pub fn get(&self, id: &RequestId) -> Option<&RequestEntry> {
        self.entries.get(id)
    }

    /// Removes and returns the entry for `id`.
    pub fn remove(&mut self, id: &RequestId) -> Option<RequestEntry> {
        self.entries.remove(id)
    }

    /// Returns `true` if `id` is pending.
    pub fn contains(&self, id: &RequestId) -> bool {
        self.entries.contains_key(id)
    }

    /// Snapshot of every pending id.
    pub fn ids(&self) -> Vec<RequestId> {
        self.entries.keys().copied().collect()
    }

    /// Iterates over every pending entry in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &RequestEntry> {
        self.entries.values()
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
