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

use crate::{error::LaneError, source::ByteSource};
use std::sync::Arc;
use tether_core::{
    DependencyKind, ImageData, LoadError, LoadRequest, LoadedValue, ResourceLoader,
};

/// Fetches an image and decodes it to RGBA8 on the CPU.
#[derive(Clone)]
pub struct ImageLoaderLane {
    source: Arc<dyn ByteSource>,
}

impl ImageLoaderLane {
    /// Creates a lane fetching from `source`.
    pub fn new(source: Arc<dyn ByteSource>) -> Self {
        Self { source }
    }

    /// Decodes any format supported by the `image` crate.
    pub fn decode(location: &str, bytes: &[u8]) -> Result<ImageData, LaneError> {
        let img = image::load_from_memory(bytes).map_err(|source| LaneError::Image {
            location: location.to_string(),
            source,
        })?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Ok(ImageData {
            width,
            height,
            pixels: rgba_img.into_raw(),
        })
    }
}

impl ResourceLoader for ImageLoaderLane {
    fn kind(&self) -> DependencyKind {
        DependencyKind::Image
    }

    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError> {
        let bytes = self.source.fetch(&request.source)?;
        let image = Self::decode(&request.source, &bytes)?;
        Ok(LoadedValue::Image(Arc::new(image)))
    }
}
