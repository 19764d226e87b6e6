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

//! # Tether Agents
//!
//! The [`Coordinator`] is the public face of the workspace. It parses
//! descriptors, registers requests in the [`DependencyStore`], dispatches one
//! load per new resource onto a [`LoadExecutor`] and fires completion
//! callbacks once every dependency of a request has loaded.
//!
//! [`DependencyStore`]: tether_data::DependencyStore

#![warn(missing_docs)]

pub mod config;
pub mod coordinator;
mod error;

pub use config::{CoordinatorConfig, ExecutorConfig};
pub use coordinator::{
    Coordinator, CoordinatorStatus, InlineExecutor, Job, LoadExecutor, ThreadedExecutor,
};
pub use error::CoordinatorError;
