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

/// A decoded raster image in RGBA8 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

/// A font face ready to be registered with a text system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// The family name the face was declared under.
    pub family: String,
    /// Where the face was loaded from.
    pub source: String,
    /// The raw font file (TrueType, OpenType, WOFF or WOFF2).
    pub data: Vec<u8>,
}

/// A handle to an audio clip.
///
/// The clip is considered ready as soon as it is constructed; playback
/// backends stream the data from `source` themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// File name of the clip.
    pub name: String,
    /// Location of the clip.
    pub source: String,
    /// Whether the backend should start buffering immediately.
    pub preload: bool,
}

/// The value produced by a successful load.
///
/// Values are reference-counted so that every request naming the same key
/// shares one copy.
#[derive(Debug, Clone)]
pub enum LoadedValue {
    /// A script was executed by the host. Scripts carry no value.
    Script,
    /// A stylesheet was applied by the host. Stylesheets carry no value.
    Stylesheet,
    /// A decoded image.
    Image(Arc<ImageData>),
    /// A UTF-8 text blob.
    Text(Arc<str>),
    /// A font face.
    Font(Arc<FontFace>),
    /// An audio clip handle.
    Audio(Arc<AudioClip>),
}

impl LoadedValue {
    /// Returns `true` for values that are delivered to completion callbacks.
    pub fn is_object(&self) -> bool {
        !matches!(self, Self::Script | Self::Stylesheet)
    }
}
