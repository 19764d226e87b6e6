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

//! # Tether Core
//!
//! Foundational crate containing the dependency model, identifiers and the
//! loader contracts shared by every other tether crate.
//!
//! It knows nothing about how bytes are fetched or how requests are tracked;
//! those live in `tether-lanes` and `tether-data` respectively.

#![warn(missing_docs)]

pub mod dependency;
pub mod diagnostics;
pub mod event;
pub mod loader;
pub mod repository;

pub use dependency::{
    Descriptor, DescriptorError, DependencyKey, DependencyKind, ModulePath, RequestId,
    OBJECT_PREFIX,
};
pub use diagnostics::{ChannelSink, Diagnostic, DiagnosticSink, LogSink};
pub use event::{LoadEvent, SettleChannel, SettleSender};
pub use loader::{
    AudioClip, FontFace, ImageData, LoadError, LoadRequest, LoadType, LoadedValue,
    ResolvedDependencies, ResourceLoader,
};
pub use repository::RepositoryMap;
