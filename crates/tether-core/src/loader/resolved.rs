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

use super::{AudioClip, FontFace, ImageData, LoadedValue};
use std::{collections::HashMap, sync::Arc};

/// The values handed to a completion callback.
///
/// Object dependencies are keyed by their logical name when they have one
/// (font family, audio file name) and by their dependency key otherwise.
/// Script dependencies never appear here.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDependencies {
    values: HashMap<String, LoadedValue>,
}

impl ResolvedDependencies {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: LoadedValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&LoadedValue> {
        self.values.get(name)
    }

    /// Returns the image stored under `name`.
    pub fn image(&self, name: &str) -> Option<&Arc<ImageData>> {
        match self.values.get(name) {
            Some(LoadedValue::Image(image)) => Some(image),
            _ => None,
        }
    }

    /// Returns the text stored under `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(LoadedValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the font face stored under `name`.
    pub fn font(&self, name: &str) -> Option<&Arc<FontFace>> {
        match self.values.get(name) {
            Some(LoadedValue::Font(font)) => Some(font),
            _ => None,
        }
    }

    /// Returns the audio clip stored under `name`.
    pub fn audio(&self, name: &str) -> Option<&Arc<AudioClip>> {
        match self.values.get(name) {
            Some(LoadedValue::Audio(clip)) => Some(clip),
            _ => None,
        }
    }

    /// Returns `true` if a value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoadedValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
