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

use std::sync::Arc;
use tether_core::{
    AudioClip, DependencyKind, LoadError, LoadRequest, LoadedValue, ResourceLoader,
};

/// Builds an audio clip handle without fetching anything.
///
/// Playback backends stream from the clip's source, so the handle is ready
/// as soon as it exists and the lane runs during registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioLoaderLane;

impl AudioLoaderLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }
}

impl ResourceLoader for AudioLoaderLane {
    fn kind(&self) -> DependencyKind {
        DependencyKind::Audio
    }

    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError> {
        let name = request.name.clone().unwrap_or_else(|| {
            request
                .source
                .rsplit('/')
                .next()
                .unwrap_or(&request.source)
                .to_string()
        });

        Ok(LoadedValue::Audio(Arc::new(AudioClip {
            name,
            source: request.source.clone(),
            preload: true,
        })))
    }

    fn is_immediate(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::{DependencyKey, LoadType};

    #[test]
    fn builds_clip_from_file_name() {
        let request = LoadRequest {
            key: DependencyKey::from("fileReader.audio('sfx/click.ogg')"),
            kind: DependencyKind::Audio,
            source: "sfx/click.ogg".to_string(),
            name: None,
            load_type: LoadType::Async,
        };

        let lane = AudioLoaderLane::new();
        assert!(lane.is_immediate());

        match lane.load(&request).unwrap() {
            LoadedValue::Audio(clip) => {
                assert_eq!(clip.name, "click.ogg");
                assert_eq!(clip.source, "sfx/click.ogg");
                assert!(clip.preload);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }
}
