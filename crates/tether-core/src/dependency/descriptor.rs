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

use super::{DependencyKey, DependencyKind};
use std::{fmt, str::FromStr};

/// Prefix that marks an object-like descriptor, e.g. `fileReader.image('a.png')`.
pub const OBJECT_PREFIX: &str = "fileReader.";

/// Prefix of the keys produced for stylesheets, keeping them apart from
/// scripts that share the same module path.
pub const STYLESHEET_KEY_PREFIX: &str = "stylesheet:";

/// A dotted module path such as `opensource.widgets.button`.
///
/// The first segment names a repository registered with the coordinator; the
/// remaining segments become the directory path below the repository base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath {
    repository: String,
    segments: Vec<String>,
}

impl ModulePath {
    /// Parses `repository.segment(.segment)*`.
    ///
    /// Each segment must be non-empty and made of ASCII alphanumerics, `_`
    /// or `-`. At least one segment must follow the repository name.
    pub fn parse(input: &str) -> Result<Self, DescriptorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DescriptorError::Empty);
        }

        let mut parts = Vec::new();
        for part in input.split('.') {
            if part.is_empty() {
                return Err(DescriptorError::InvalidModulePath {
                    path: input.to_string(),
                    reason: "empty path segment",
                });
            }
            if let Some(character) = part.chars().find(|c| !is_segment_char(*c)) {
                return Err(DescriptorError::InvalidCharacter {
                    path: input.to_string(),
                    character,
                });
            }
            parts.push(part.to_string());
        }

        let mut parts = parts.into_iter();
        let repository = parts.next().ok_or(DescriptorError::Empty)?;
        let segments: Vec<String> = parts.collect();
        if segments.is_empty() {
            return Err(DescriptorError::InvalidModulePath {
                path: input.to_string(),
                reason: "expected `repository.module`",
            });
        }

        Ok(Self {
            repository,
            segments,
        })
    }

    /// The repository name (first segment).
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The path segments following the repository name.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The segments joined as a `/`-separated relative path.
    pub fn relative_path(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.repository, self.segments.join("."))
    }
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// A parsed dependency descriptor.
///
/// This is the typed form of the strings passed to `require`. Parsing never
/// panics; malformed input yields a [`DescriptorError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// `repository.path.to.module`
    Script(ModulePath),
    /// A stylesheet registered through `add_stylesheet`. Never produced by
    /// [`Descriptor::parse`].
    Stylesheet(ModulePath),
    /// `fileReader.image('<url>')`
    Image {
        /// Location of the image.
        url: String,
    },
    /// `fileReader.text('<url>')`
    Text {
        /// Location of the text blob.
        url: String,
    },
    /// `fileReader.fontFace('<family>','<url>')`
    FontFace {
        /// Family name the face is registered under.
        family: String,
        /// Location of the font file.
        url: String,
    },
    /// `fileReader.audio('<url>')`
    Audio {
        /// Location of the audio clip.
        url: String,
    },
}

impl Descriptor {
    /// Parses a descriptor string.
    ///
    /// Strings starting with [`OBJECT_PREFIX`] are object descriptors; anything
    /// else is treated as a script module path.
    pub fn parse(input: &str) -> Result<Self, DescriptorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DescriptorError::Empty);
        }

        match input.strip_prefix(OBJECT_PREFIX) {
            Some(call) => parse_object(input, call),
            None => ModulePath::parse(input).map(Self::Script),
        }
    }

    /// Builds a stylesheet descriptor from a module path.
    pub fn stylesheet(module: &str) -> Result<Self, DescriptorError> {
        ModulePath::parse(module).map(Self::Stylesheet)
    }

    /// The kind of unit this descriptor names.
    pub fn kind(&self) -> DependencyKind {
        match self {
            Self::Script(_) => DependencyKind::Script,
            Self::Stylesheet(_) => DependencyKind::Stylesheet,
            Self::Image { .. } => DependencyKind::Image,
            Self::Text { .. } => DependencyKind::Text,
            Self::FontFace { .. } => DependencyKind::FontFace,
            Self::Audio { .. } => DependencyKind::Audio,
        }
    }

    /// The canonical key used for deduplication.
    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(self.to_string())
    }

    /// The name under which an object value is delivered to callbacks, when it
    /// differs from the key.
    ///
    /// Font faces use their family name; audio clips use the last segment of
    /// their URL.
    pub fn logical_name(&self) -> Option<&str> {
        match self {
            Self::FontFace { family, .. } => Some(family),
            Self::Audio { url } => url.rsplit('/').next().filter(|name| !name.is_empty()),
            _ => None,
        }
    }

    /// The module path of script and stylesheet descriptors.
    pub fn module(&self) -> Option<&ModulePath> {
        match self {
            Self::Script(module) | Self::Stylesheet(module) => Some(module),
            _ => None,
        }
    }

    /// The URL of object descriptors.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image { url }
            | Self::Text { url }
            | Self::FontFace { url, .. }
            | Self::Audio { url } => Some(url),
            Self::Script(_) | Self::Stylesheet(_) => None,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script(module) => write!(f, "{module}"),
            Self::Stylesheet(module) => write!(f, "{STYLESHEET_KEY_PREFIX}{module}"),
            Self::Image { url } => write!(f, "{OBJECT_PREFIX}image('{url}')"),
            Self::Text { url } => write!(f, "{OBJECT_PREFIX}text('{url}')"),
            Self::FontFace { family, url } => {
                write!(f, "{OBJECT_PREFIX}fontFace('{family}','{url}')")
            }
            Self::Audio { url } => write!(f, "{OBJECT_PREFIX}audio('{url}')"),
        }
    }
}

impl FromStr for Descriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_object(descriptor: &str, call: &str) -> Result<Descriptor, DescriptorError> {
    let kind_name = call.split('(').next().unwrap_or_default();
    let (kind, arity) = match kind_name {
        "image" => (DependencyKind::Image, 1),
        "text" => (DependencyKind::Text, 1),
        "fontFace" => (DependencyKind::FontFace, 2),
        "audio" => (DependencyKind::Audio, 1),
        other => {
            return Err(DescriptorError::UnknownKind {
                kind: other.to_string(),
            })
        }
    };

    let malformed = |reason| DescriptorError::Malformed {
        descriptor: descriptor.to_string(),
        reason,
    };

    let body = call[kind_name.len()..]
        .strip_prefix('(')
        .ok_or_else(|| malformed("expected `(` after the kind"))?;
    let mut args = parse_arguments(body).map_err(malformed)?;

    if args.len() != arity {
        return Err(DescriptorError::ArityMismatch {
            kind,
            expected: arity,
            found: args.len(),
        });
    }
    if let Some(position) = args.iter().position(|arg| arg.is_empty()) {
        return Err(DescriptorError::EmptyArgument { kind, position });
    }

    let last = args.pop().unwrap_or_default();
    Ok(match kind {
        DependencyKind::Image => Descriptor::Image { url: last },
        DependencyKind::Text => Descriptor::Text { url: last },
        DependencyKind::Audio => Descriptor::Audio { url: last },
        _ => Descriptor::FontFace {
            family: args.pop().unwrap_or_default(),
            url: last,
        },
    })
}

/// Parses `'a', 'b')` (the text after the opening parenthesis).
fn parse_arguments(body: &str) -> Result<Vec<String>, &'static str> {
    let mut args = Vec::new();
    let mut rest = body.trim_start();

    if let Some(after) = rest.strip_prefix(')') {
        rest = after;
    } else {
        loop {
            let quoted = rest
                .strip_prefix('\'')
                .ok_or("arguments must be single-quoted strings")?;
            let end = quoted.find('\'').ok_or("unterminated quoted argument")?;
            args.push(quoted[..end].to_string());
            rest = quoted[end + 1..].trim_start();

            if let Some(after) = rest.strip_prefix(',') {
                rest = after.trim_start();
            } else if let Some(after) = rest.strip_prefix(')') {
                rest = after;
                break;
            } else {
                return Err("expected `,` or `)` after an argument");
            }
        }
    }

    if !rest.trim().is_empty() {
        return Err("unexpected input after `)`");
    }
    Ok(args)
}

/// The reasons a descriptor string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The descriptor was empty or only whitespace.
    Empty,
    /// An object descriptor named a kind that is not recognised.
    UnknownKind {
        /// The kind name as written.
        kind: String,
    },
    /// An object descriptor did not follow `kind('arg', ...)`.
    Malformed {
        /// The full descriptor as written.
        descriptor: String,
        /// What the parser expected.
        reason: &'static str,
    },
    /// An object descriptor had the wrong number of arguments.
    ArityMismatch {
        /// The kind being parsed.
        kind: DependencyKind,
        /// Number of arguments the kind takes.
        expected: usize,
        /// Number of arguments found.
        found: usize,
    },
    /// An argument was an empty string.
    EmptyArgument {
        /// The kind being parsed.
        kind: DependencyKind,
        /// Zero-based index of the empty argument.
        position: usize,
    },
    /// A module path was structurally invalid.
    InvalidModulePath {
        /// The module path as written.
        path: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A module path segment contained a character outside `[A-Za-z0-9_-]`.
    InvalidCharacter {
        /// The module path as written.
        path: String,
        /// The offending character.
        character: char,
    },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::Empty => write!(f, "Empty dependency descriptor"),
            DescriptorError::UnknownKind { kind } => {
                write!(f, "Unknown object kind '{kind}'")
            }
            DescriptorError::Malformed { descriptor, reason } => {
                write!(f, "Malformed descriptor '{descriptor}': {reason}")
            }
            DescriptorError::ArityMismatch {
                kind,
                expected,
                found,
            } => write!(
                f,
                "'{kind}' takes {expected} argument(s) but {found} were given"
            ),
            DescriptorError::EmptyArgument { kind, position } => {
                write!(f, "Argument {position} of '{kind}' is empty")
            }
            DescriptorError::InvalidModulePath { path, reason } => {
                write!(f, "Invalid module path '{path}': {reason}")
            }
            DescriptorError::InvalidCharacter { path, character } => {
                write!(f, "Invalid character '{character}' in module path '{path}'")
            }
        }
    }
}

impl std::error::Error for DescriptorError {}
