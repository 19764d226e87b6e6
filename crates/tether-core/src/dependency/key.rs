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

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

/// A string uniquely identifying one loadable unit.
///
/// Two requests naming the same key share one underlying load. Keys are
/// produced from a parsed [`Descriptor`](super::Descriptor) so that
/// cosmetic differences in the input (whitespace between arguments) never
/// produce two loads of the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyKey(String);

impl DependencyKey {
    /// Wraps an already canonical key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DependencyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DependencyKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DependencyKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The kind of a loadable unit.
///
/// Package-like kinds ([`Script`](Self::Script), [`Stylesheet`](Self::Stylesheet))
/// are satisfied by presence alone. Object-like kinds produce a value that is
/// handed to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    /// A script module resolved through a repository.
    Script,
    /// A stylesheet resolved through a repository.
    Stylesheet,
    /// A decoded raster image.
    Image,
    /// A UTF-8 text blob.
    Text,
    /// A font face with a declared family name.
    FontFace,
    /// An audio clip handle.
    Audio,
}

impl DependencyKind {
    /// Returns `true` if dependencies of this kind deliver a value to callbacks.
    pub fn is_object(self) -> bool {
        !matches!(self, Self::Script | Self::Stylesheet)
    }

    /// The name used for this kind in descriptors and log output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Stylesheet => "stylesheet",
            Self::Image => "image",
            Self::Text => "text",
            Self::FontFace => "fontFace",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
