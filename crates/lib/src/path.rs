//! Content paths for computing qualified field names.
//!
//! A [`ContentPath`] tracks the chain of container names entered while walking a
//! mapping tree, together with the active [`PathType`]. Mappers use it to turn their
//! own short name into the dotted name a document field is stored under.
//!
//! # Usage
//!
//! ```rust
//! use docmapper::path::{ContentPath, PathType};
//!
//! let mut path = ContentPath::new();
//! path.add("title");
//! assert_eq!(path.full_path_as_text("raw"), "title.raw");
//!
//! let previous = path.set_path_type(PathType::JustName);
//! assert_eq!(path.full_path_as_text("raw"), "raw");
//!
//! path.set_path_type(previous);
//! path.remove();
//! assert_eq!(path.full_path_as_text("raw"), "raw");
//! ```
//!
//! The path is plain single-threaded state. It is carried inside the build and parse
//! contexts, and every mapper that changes it restores the previous state before
//! returning.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between path segments.
pub const SEPARATOR: char = '.';

/// Error type for path parsing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The textual path type is not one of `full` or `just_name`.
    #[error("Unknown path type '{value}', expected 'full' or 'just_name'")]
    UnknownPathType { value: String },
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}

/// Controls how a field's qualified name is derived from its ancestors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// The qualified name is every entered container name plus the field name.
    #[default]
    Full,
    /// The qualified name is the field name alone.
    JustName,
}

impl PathType {
    /// The lowercase name used in mapping definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathType::Full => "full",
            PathType::JustName => "just_name",
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathType {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PathType::Full),
            "just_name" => Ok(PathType::JustName),
            other => Err(PathError::UnknownPathType {
                value: other.to_string(),
            }),
        }
    }
}

/// The name prefix and path mode of the current position in a mapping tree walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPath {
    segments: Vec<String>,
    path_type: PathType,
}

impl ContentPath {
    /// Creates an empty path in [`PathType::Full`] mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty path with the given mode.
    pub fn with_path_type(path_type: PathType) -> Self {
        Self {
            segments: Vec::new(),
            path_type,
        }
    }

    /// Pushes a name segment.
    pub fn add(&mut self, name: impl Into<String>) {
        self.segments.push(name.into());
    }

    /// Pops the most recently pushed segment.
    pub fn remove(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Number of pushed segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The active path mode.
    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    /// Installs a new path mode, returning the previous one so it can be restored.
    pub fn set_path_type(&mut self, path_type: PathType) -> PathType {
        std::mem::replace(&mut self.path_type, path_type)
    }

    /// Iterates the pushed segments from outermost to innermost.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// The qualified name of a field called `name` at the current position.
    ///
    /// In [`PathType::Full`] mode this joins every pushed segment and `name` with
    /// [`SEPARATOR`]. In [`PathType::JustName`] mode it is `name` unchanged.
    pub fn full_path_as_text(&self, name: &str) -> String {
        match self.path_type {
            PathType::JustName => name.to_string(),
            PathType::Full => {
                if self.segments.is_empty() {
                    return name.to_string();
                }
                let capacity = self.segments.iter().map(|s| s.len() + 1).sum::<usize>() + name.len();
                let mut full = String::with_capacity(capacity);
                for segment in &self.segments {
                    full.push_str(segment);
                    full.push(SEPARATOR);
                }
                full.push_str(name);
                full
            }
        }
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
