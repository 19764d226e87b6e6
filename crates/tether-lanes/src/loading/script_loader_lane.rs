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
use crate::{error::LaneError, host::ScriptHost, source::ByteSource};
use std::sync::Arc;
use tether_core::{DependencyKind, LoadError, LoadRequest, LoadedValue, ResourceLoader};

/// Fetches a script module and hands it to the [`ScriptHost`] for execution.
#[derive(Clone)]
pub struct ScriptLoaderLane {
    source: Arc<dyn ByteSource>,
    host: Arc<dyn ScriptHost>,
}

impl ScriptLoaderLane {
    /// Creates a lane fetching from `source` and executing on `host`.
    pub fn new(source: Arc<dyn ByteSource>, host: Arc<dyn ScriptHost>) -> Self {
        Self { source, host }
    }

    fn execute(&self, request: &LoadRequest) -> Result<LoadedValue, LaneError> {
        let bytes = self.source.fetch(&request.source)?;
        let script = decode_utf8(&request.source, bytes)?;

        self.host
            .execute_script(&request.key, &script)
            .map_err(|reason| LaneError::Host {
                key: request.key.clone(),
                reason,
            })?;

        log::trace!("Executed script '{}' ({} bytes)", request.key, script.len());
        Ok(LoadedValue::Script)
    }
}

impl ResourceLoader for ScriptLoaderLane {
    fn kind(&self) -> DependencyKind {
        DependencyKind::Script
    }

    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError> {
        Ok(self.execute(request)?)
    }
}
