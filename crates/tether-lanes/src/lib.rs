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

//! # Tether Lanes
//!
//! The hot path of the coordinator: one [`ResourceLoader`] per dependency
//! kind, the [`ByteSource`]s they fetch from and the [`ScriptHost`] that
//! receives scripts and stylesheets.

#![warn(missing_docs)]

mod error;
pub mod host;
pub mod loading;
pub mod source;

pub use error::{FetchError, LaneError};
pub use host::{RecordingHost, ScriptHost};
pub use loading::*;
pub use source::{ByteSource, FileSystemSource, MemorySource};

use std::sync::Arc;
use tether_core::ResourceLoader;

/// Builds one loader per dependency kind, all fetching from `source`.
pub fn standard_lanes(
    source: Arc<dyn ByteSource>,
    host: Arc<dyn ScriptHost>,
) -> Vec<Arc<dyn ResourceLoader>> {
    vec![
        Arc::new(ScriptLoaderLane::new(source.clone(), host.clone())),
        Arc::new(StylesheetLoaderLane::new(source.clone(), host)),
        Arc::new(TextLoaderLane::new(source.clone())),
        Arc::new(ImageLoaderLane::new(source.clone())),
        Arc::new(FontLoaderLane::new(source)),
        Arc::new(AudioLoaderLane::new()),
    ]
}
