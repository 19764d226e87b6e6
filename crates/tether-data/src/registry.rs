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

//! The deduplicated table of tracked resources.

use ahash::{AHashMap, AHashSet};
use std::collections::hash_map::Entry;
use tether_core::{
    DependencyKey, DependencyKind, Descriptor, LoadedValue, RepositoryMap, RequestId,
};
use thiserror::Error;

/// Load status of a resource. `Loaded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    /// The loader has been started and has not reported back.
    Pending,
    /// The loader succeeded; the value is available.
    Loaded,
    /// The loader failed. Failed resources are never retried.
    Failed,
}

/// Everything needed to create a resource entry and start its load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Identity of the resource.
    pub key: DependencyKey,
    /// Kind of the resource.
    pub kind: DependencyKind,
    /// Resolved location.
    pub source: String,
    /// Logical name used when delivering the value.
    pub name: Option<String>,
}

impl ResourceSpec {
    /// Builds the spec for a parsed descriptor, resolving module paths with
    /// `repositories` and the given extension.
    pub fn from_descriptor(
        descriptor: &Descriptor,
        repositories: &RepositoryMap,
        extension: &str,
    ) -> Self {
        let source = match (descriptor.module(), descriptor.url()) {
            (Some(module), _) => repositories.resolve(module, extension),
            (None, Some(url)) => url.to_string(),
            (None, None) => String::new(),
        };

        Self {
            key: descriptor.key(),
            kind: descriptor.kind(),
            source,
            name: descriptor.logical_name().map(str::to_string),
        }
    }
}

/// The registry record for one dependency key.
#[derive(Debug)]
pub struct ResourceEntry {
    key: DependencyKey,
    kind: DependencyKind,
    source: String,
    name: Option<String>,
    status: ResourceStatus,
    value: Option<LoadedValue>,
    failure: Option<String>,
    waiters: AHashSet<RequestId>,
}

impl ResourceEntry {
    fn new(spec: &ResourceSpec, waiter: Option<RequestId>) -> Self {
        Self {
            key: spec.key.clone(),
            kind: spec.kind,
            source: spec.source.clone(),
            name: spec.name.clone(),
            status: ResourceStatus::Pending,
            value: None,
            failure: None,
            waiters: waiter.into_iter().collect(),
        }
    }

    /// Identity of the resource.
    pub fn key(&self) -> &DependencyKey {
        &self.key
    }

    /// Kind of the resource.
    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    /// Location the resource is loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Logical name, if the descriptor declared one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name a callback receives this value under.
    pub fn delivery_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.key.as_str())
    }

    /// Current status.
    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    /// The loaded value, once `Loaded`.
    pub fn value(&self) -> Option<&LoadedValue> {
        self.value.as_ref()
    }

    /// The failure reason, once `Failed`.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Requests currently waiting on this resource.
    pub fn waiters(&self) -> &AHashSet<RequestId> {
        &self.waiters
    }

    /// Returns `true` if `id` is waiting on this resource.
    pub fn has_waiter(&self, id: &RequestId) -> bool {
        self.waiters.contains(id)
    }
}

/// Result of [`ResourceRegistry::get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new entry was created; the caller must start exactly one load.
    Created,
    /// The key was already tracked with the given status; no load starts.
    Existing(ResourceStatus),
}

/// Errors raised by illegal registry transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The key has never been registered.
    #[error("Resource '{0}' is not registered")]
    UnknownKey(DependencyKey),
    /// The resource already reached a terminal status.
    #[error("Resource '{key}' already settled as {status:?}")]
    AlreadySettled {
        /// The resource.
        key: DependencyKey,
        /// Its terminal status.
        status: ResourceStatus,
    },
}

/// One entry per dependency key for the lifetime of the coordinator.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: AHashMap<DependencyKey, ResourceEntry>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `spec.key`, creating it if needed, and records
    /// `waiter` on it.
    ///
    /// A new entry starts as `Pending`. An existing entry keeps its status,
    /// source and value untouched.
    pub fn get_or_create(
        &mut self,
        spec: &ResourceSpec,
        waiter: Option<RequestId>,
    ) -> Registration {
        match self.entries.entry(spec.key.clone()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if let Some(waiter) = waiter {
                    entry.waiters.insert(waiter);
                }
                Registration::Existing(entry.status)
            }
            Entry::Vacant(vacant) => {
                log::trace!(
                    "Tracking new resource '{}' from '{}'",
                    spec.key,
                    spec.source
                );
                vacant.insert(ResourceEntry::new(spec, waiter));
                Registration::Created
            }
        }
    }

    /// Returns the entry for `key`.
    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.get(key)
    }

    /// Returns the status of `key`.
    pub fn status(&self, key: &str) -> Option<ResourceStatus> {
        self.entries.get(key).map(ResourceEntry::status)
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Transitions `key` from `Pending` to `Loaded`.
    pub fn mark_loaded(
        &mut self,
        key: &DependencyKey,
        value: LoadedValue,
    ) -> Result<&ResourceEntry, RegistryError> {
        let entry = self.pending_entry(key)?;
        entry.status = ResourceStatus::Loaded;
        entry.value = Some(value);
        Ok(entry)
    }

    /// Transitions `key` from `Pending` to `Failed`.
    pub fn mark_failed(
        &mut self,
        key: &DependencyKey,
        reason: impl Into<String>,
    ) -> Result<&ResourceEntry, RegistryError> {
        let entry = self.pending_entry(key)?;
        entry.status = ResourceStatus::Failed;
        entry.failure = Some(reason.into());
        Ok(entry)
    }

    fn pending_entry(
        &mut self,
        key: &DependencyKey,
    ) -> Result<&mut ResourceEntry, RegistryError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| RegistryError::UnknownKey(key.clone()))?;
        match entry.status {
            ResourceStatus::Pending => Ok(entry),
            status => Err(RegistryError::AlreadySettled {
                key: key.clone(),
                status,
            }),
        }
    }

    /// Removes `id` from the waiter set of every entry. Returns how many
    /// entries listed it.
    pub fn remove_waiter(&mut self, id: &RequestId) -> usize {
        self.entries
            .values_mut()
            .map(|entry| entry.waiters.remove(id))
            .filter(|removed| *removed)
            .count()
    }

    /// Number of tracked resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every entry in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.values()
    }

    /// Number of entries with the given status.
    pub fn count_with_status(&self, status: ResourceStatus) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.status == status)
            .count()
    }
}
