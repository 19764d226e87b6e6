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

//! The single owner of the registry and the request table.

use crate::registry::{Registration, ResourceRegistry, ResourceSpec, ResourceStatus};
use crate::request::{CompletionCallback, RequestEntry, RequestPlan, RequestTable};
use tether_core::{RequestId, ResolvedDependencies};

/// Owns the [`ResourceRegistry`] and the [`RequestTable`].
///
/// Every operation that touches both goes through here, so the waiter sets
/// and the request table never disagree between two calls.
#[derive(Debug, Default)]
pub struct DependencyStore {
    registry: ResourceRegistry,
    requests: RequestTable,
}

impl DependencyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Write access to the registry, for status transitions.
    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    /// Read access to the request table.
    pub fn requests(&self) -> &RequestTable {
        &self.requests
    }

    /// Creates the request entry described by `plan` and registers each of
    /// its dependencies with the request as waiter.
    ///
    /// Returns the specs whose entries were newly created; the caller starts
    /// exactly one load for each of them.
    pub fn register(
        &mut self,
        plan: RequestPlan,
        callback: CompletionCallback,
    ) -> Vec<ResourceSpec> {
        let mut entry = RequestEntry::new(plan.id, callback, plan.load_type);
        for descriptor in plan.rejected {
            entry.reject(descriptor);
        }

        let mut created = Vec::new();
        for spec in plan.dependencies {
            entry.add_dependency(spec.key.clone(), spec.kind);
            if self.registry.get_or_create(&spec, Some(plan.id)) == Registration::Created {
                created.push(spec);
            }
        }

        if self.requests.insert(entry).is_some() {
            log::warn!("Request {} was registered twice", plan.id);
        }
        created
    }

    /// Tracks a resource nobody waits on (stylesheets).
    pub fn register_standalone(&mut self, spec: &ResourceSpec) -> Registration {
        self.registry.get_or_create(spec, None)
    }

    /// Deletes the request and removes its id from every waiter set.
    ///
    /// Idempotent: removing an absent id returns `None` and changes nothing.
    pub fn remove_waiter(&mut self, id: &RequestId) -> Option<RequestEntry> {
        let entry = self.requests.remove(id);
        let cleared = self.registry.remove_waiter(id);
        if entry.is_some() {
            log::trace!("Request {id} removed from {cleared} waiter set(s)");
        }
        entry
    }

    /// Returns `true` if every dependency of `id` is `Loaded` and none of its
    /// descriptors was rejected.
    pub fn is_satisfied(&self, id: &RequestId) -> bool {
        self.requests.get(id).is_some_and(|entry| {
            entry.rejected().is_empty()
                && entry
                    .dependencies()
                    .all(|key| self.registry.status(key.as_str()) == Some(ResourceStatus::Loaded))
        })
    }

    /// Builds the mapping handed to the callback of `id`.
    pub fn resolve(&self, id: &RequestId) -> Option<ResolvedDependencies> {
        let entry = self.requests.get(id)?;
        let mut resolved = ResolvedDependencies::new();
        for key in entry.object_keys() {
            if let Some(resource) = self.registry.get(key.as_str()) {
                if let Some(value) = resource.value() {
                    resolved.insert(resource.delivery_name(), value.clone());
                }
            }
        }
        Some(resolved)
    }

    /// If `id` is satisfied, removes it and returns its callback with the
    /// resolved values. The caller invokes the callback.
    pub fn take_satisfied(
        &mut self,
        id: &RequestId,
    ) -> Option<(CompletionCallback, ResolvedDependencies)> {
        if !self.is_satisfied(id) {
            return None;
        }
        let resolved = self.resolve(id)?;
        let entry = self.remove_waiter(id)?;
        Some((entry.into_callback(), resolved))
    }
}
