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

//! One loader lane per dependency kind.

mod audio_loader_lane;
mod font_loader_lane;
mod image_loader_lane;
mod script_loader_lane;
mod stylesheet_loader_lane;
mod text_loader_lane;

pub use audio_loader_lane::*;
pub use font_loader_lane::*;
pub use image_loader_lane::*;
pub use script_loader_lane::*;
pub use stylesheet_loader_lane::*;
pub use text_loader_lane::*;

use crate::error::LaneError;

/// Decodes fetched bytes as UTF-8.
fn decode_utf8(location: &str, bytes: Vec<u8>) -> Result<String, LaneError> {
    String::from_utf8(bytes).map_err(|source| LaneError::InvalidUtf8 {
        location: location.to_string(),
        source,
    })
}
