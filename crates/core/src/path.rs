//! Field paths into value objects
//!
//! A [`FieldPath`] names a field of a value type, optionally descending into
//! nested value types: `amount`, `owner.first`. The same path is used for
//! in-process projection and, rendered as `$.owner.first`, as the extraction
//! path handed to a storage engine's JSON functions.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `name` | Field | `amount` |
//! | `a.b` | Field of a nested value | `owner.first` |
//! | `$.a.b` | Same, in extraction form | `$.owner.first` |
//!
//! Segments follow the identifier rules of [`crate::schema`]; there is no
//! array indexing because value objects hold no arrays.

use crate::schema::validate_identifier;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a field path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    /// The path has no segments
    #[error("empty path")]
    Empty,
    /// Two dots in a row, or a leading/trailing dot
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    /// A segment is not a valid identifier
    #[error("invalid segment: {0}")]
    InvalidSegment(String),
}

/// Dotted path to a field
///
/// # Examples
///
/// ```
/// use tessera_core::FieldPath;
///
/// let path: FieldPath = "owner.first".parse().unwrap();
/// assert_eq!(path.depth(), 2);
/// assert_eq!(path.to_json_path(), "$.owner.first");
///
/// let same: FieldPath = "$.owner.first".parse().unwrap();
/// assert_eq!(path, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[String; 2]>,
}

impl FieldPath {
    /// Single-segment path
    pub fn field(name: impl Into<String>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(name.into());
        FieldPath { segments }
    }

    /// Append a segment (builder pattern)
    pub fn then(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    /// Path segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Dotted form: `owner.first`
    pub fn to_path_string(&self) -> String {
        self.segments.join(".")
    }

    /// Extraction form for storage engine JSON functions: `$.owner.first`
    pub fn to_json_path(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.segments {
            out.push('.');
            out.push_str(seg);
        }
        out
    }
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("$.").unwrap_or(s);
        if body.is_empty() {
            return Err(PathParseError::Empty);
        }

        let mut segments = SmallVec::new();
        let mut offset = s.len() - body.len();
        for seg in body.split('.') {
            if seg.is_empty() {
                return Err(PathParseError::EmptySegment(offset));
            }
            validate_identifier(seg).map_err(PathParseError::InvalidSegment)?;
            segments.push(seg.to_string());
            offset += seg.len() + 1;
        }

        Ok(FieldPath { segments })
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = PathParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}
