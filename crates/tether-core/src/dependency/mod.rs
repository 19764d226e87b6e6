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

//! The vocabulary used to name dependencies.
//!
//! - [`DependencyKey`]: the identity used for deduplication.
//! - [`DependencyKind`]: what sort of unit a key refers to.
//! - [`Descriptor`]: the parsed form of a user-supplied dependency string.
//! - [`RequestId`]: the identity of one `require` call.

mod descriptor;
mod key;
mod request_id;

pub use descriptor::*;
pub use key::*;
pub use request_id::*;
