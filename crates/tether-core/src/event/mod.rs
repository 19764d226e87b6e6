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

//! Settle events carrying loader outcomes back to the coordinator.

mod channel;

pub use self::channel::{SettleChannel, SettleSender};

use crate::dependency::DependencyKey;
use crate::loader::LoadedValue;
use std::time::Duration;

/// The outcome of one load, published exactly once per dispatched load.
#[derive(Debug, Clone)]
pub struct LoadEvent {
    /// The resource that settled.
    pub key: DependencyKey,
    /// The loaded value, or the rendered load error.
    pub outcome: Result<LoadedValue, String>,
    /// Wall time spent inside the loader.
    pub elapsed: Duration,
}

impl LoadEvent {
    /// Builds a success event.
    pub fn loaded(key: DependencyKey, value: LoadedValue, elapsed: Duration) -> Self {
        Self {
            key,
            outcome: Ok(value),
            elapsed,
        }
    }

    /// Builds a failure event.
    pub fn failed(key: DependencyKey, reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            key,
            outcome: Err(reason.into()),
            elapsed,
        }
    }

    /// Returns `true` if the load succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
