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

use super::decode_utf8;
use crate::source::ByteSource;
use std::sync::Arc;
use tether_core::{DependencyKind, LoadError, LoadRequest, LoadedValue, ResourceLoader};

/// Fetches a UTF-8 text blob.
#[derive(Clone)]
pub struct TextLoaderLane {
    source: Arc<dyn ByteSource>,
}

impl TextLoaderLane {
    /// Creates a lane fetching from `source`.
    pub fn new(source: Arc<dyn ByteSource>) -> Self {
        Self { source }
    }
}

impl ResourceLoader for TextLoaderLane {
    fn kind(&self) -> DependencyKind {
        DependencyKind::Text
    }

    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError> {
        let bytes = self.source.fetch(&request.source)?;
        let text = decode_utf8(&request.source, bytes)?;
        Ok(LoadedValue::Text(Arc::from(text)))
    }
}
