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

use std::string::FromUtf8Error;
use tether_core::DependencyKey;
use thiserror::Error;

/// Errors raised while fetching bytes.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Nothing exists at the location.
    #[error("'{location}' was not found")]
    NotFound {
        /// The requested location.
        location: String,
    },
    /// The location uses a scheme this source cannot serve.
    #[error("Scheme of '{location}' is not supported by this source")]
    UnsupportedScheme {
        /// The requested location.
        location: String,
    },
    /// The location escapes the source root.
    #[error("'{location}' points outside the source root")]
    OutsideRoot {
        /// The requested location.
        location: String,
    },
    /// Reading failed.
    #[error("Failed to read '{location}': {source}")]
    Io {
        /// The requested location.
        location: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the loader lanes.
#[derive(Debug, Error)]
pub enum LaneError {
    /// The bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A text resource was not UTF-8.
    #[error("'{location}' is not valid UTF-8: {source}")]
    InvalidUtf8 {
        /// Where the bytes came from.
        location: String,
        /// The decoding error.
        #[source]
        source: FromUtf8Error,
    },
    /// An image could not be decoded.
    #[error("Failed to decode image '{location}': {source}")]
    Image {
        /// Where the bytes came from.
        location: String,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },
    /// A font file had an unknown signature.
    #[error("'{location}' is not a TrueType, OpenType or WOFF font")]
    UnsupportedFont {
        /// Where the bytes came from.
        location: String,
    },
    /// The host refused a script or stylesheet.
    #[error("Host rejected '{key}': {reason}")]
    Host {
        /// The resource being applied.
        key: DependencyKey,
        /// The host's explanation.
        reason: String,
    },
}
