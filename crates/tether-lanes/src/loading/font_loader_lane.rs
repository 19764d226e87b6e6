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
    DependencyKind, FontFace, LoadError, LoadRequest, LoadedValue, ResourceLoader,
};

/// Leading bytes of the font containers a face can be built from.
const FONT_SIGNATURES: [[u8; 4]; 7] = [
    [0x00, 0x01, 0x00, 0x00],
    *b"OTTO",
    *b"true",
    *b"typ1",
    *b"ttcf",
    *b"wOFF",
    *b"wOF2",
];

/// Fetches a font file and declares it under the requested family.
#[derive(Clone)]
pub struct FontLoaderLane {
    source: Arc<dyn ByteSource>,
}

impl FontLoaderLane {
    /// Creates a lane fetching from `source`.
    pub fn new(source: Arc<dyn ByteSource>) -> Self {
        Self { source }
    }

    /// Returns `true` if `bytes` start with a known font signature.
    pub fn is_font(bytes: &[u8]) -> bool {
        bytes
            .get(..4)
            .is_some_and(|magic| FONT_SIGNATURES.iter().any(|sig| sig == magic))
    }
}

impl ResourceLoader for FontLoaderLane {
    fn kind(&self) -> DependencyKind {
        DependencyKind::FontFace
    }

    fn load(&self, request: &LoadRequest) -> Result<LoadedValue, LoadError> {
        let data = self.source.fetch(&request.source)?;
        if !Self::is_font(&data) {
            return Err(LaneError::UnsupportedFont {
                location: request.source.clone(),
            }
            .into());
        }

        let family = request
            .name
            .clone()
            .unwrap_or_else(|| request.key.to_string());

        Ok(LoadedValue::Font(Arc::new(FontFace {
            family,
            source: request.source.clone(),
            data,
        })))
    }
}
