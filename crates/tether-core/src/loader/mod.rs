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

//! The contract between the coordinator and the per-kind loaders.

mod resolved;
mod value;

pub use resolved::*;
pub use value::*;

use crate::dependency::{DependencyKey, DependencyKind};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// The error type returned by a [`ResourceLoader`]. Must be thread-safe.
pub type LoadError = Box<dyn Error + Send + Sync + 'static>;

/// Hint forwarded to loaders and executors.
///
/// It affects how loads are scheduled, never when a request is considered
/// complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// Loads may complete in any order.
    #[default]
    Async,
    /// Loads are executed one after another, in dispatch order.
    Synchronous,
}

/// Everything a loader needs to start one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Identity of the resource being loaded.
    pub key: DependencyKey,
    /// The kind of resource.
    pub kind: DependencyKind,
    /// The resolved location to load from.
    pub source: String,
    /// Logical name for object values (font family, audio file name).
    pub name: Option<String>,
    /// Scheduling hint of the request that first named this resource.
    pub load_type: LoadType,
}

/// A loader for one [`DependencyKind`].
///
/// Implementors perform the fetch and construction of a single resource. The
/// call may block; the coordinator runs it on its executor and reports the
/// outcome back exactly once.
pub trait ResourceLoader: Send + Sync {
    /// The kind this loader handles.
    fn kind(&self) -> DependencyKind;

    /// Fetches and constructs the resource described by `request`.
    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError>;

    /// Loaders returning `true` are run during registration instead of being
    /// dispatched, so their outcome is known before `require` returns.
    fn is_immediate(&self) -> bool {
        false
    }
}
