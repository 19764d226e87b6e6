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

//! # Tether Data
//!
//! The bookkeeping structures of the coordinator:
//!
//! - [`ResourceRegistry`]: one [`ResourceEntry`] per dependency key, with its
//!   status, value and waiter set.
//! - [`RequestTable`]: one [`RequestEntry`] per pending `require` call.
//! - [`DependencyStore`]: owns both and performs every mutation that touches
//!   them together, so that no caller can observe a request that is gone but
//!   still listed as a waiter.

#![warn(missing_docs)]

pub mod registry;
pub mod request;
pub mod store;

pub use registry::{
    Registration, RegistryError, ResourceEntry, ResourceRegistry, ResourceSpec, ResourceStatus,
};
pub use request::{CompletionCallback, RequestEntry, RequestPlan, RequestTable};
pub use store::DependencyStore;
