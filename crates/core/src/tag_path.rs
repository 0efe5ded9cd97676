//! Hierarchical tag paths
//!
//! A tag path is a non-empty sequence of `/`-joined segments, e.g.
//! `Tech/AI/Agents`. Validation rules enforced by all API layers:
//! - at least one segment
//! - each segment is 1-24 characters drawn from `[A-Za-z0-9 _-]`
//! - the whole path is at most 200 bytes
//!
//! Two tag paths are equal iff their segment sequences are equal,
//! case-sensitively. Ordering is segment-wise lexicographic (not a compare
//! of the joined string): `A/B` sorts before `A B` because the first
//! segment `A` is a strict prefix of `A B`.

use crate::limits::Limits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A validated, slash-delimited hierarchical tag path
///
/// Stored as its segment sequence; the joined string form is available via
/// `Display`. Construction always goes through [`TagPath::parse`], so an
/// instance is valid by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagPath {
    segments: Vec<String>,
}

impl TagPath {
    /// Parse and validate a tag path using default limits
    ///
    /// # Examples
    ///
    /// ```
    /// use linkstacks_core::TagPath;
    ///
    /// let path = TagPath::parse("Tech/AI").unwrap();
    /// assert_eq!(path.depth(), 2);
    ///
    /// assert!(TagPath::parse("").is_err());
    /// assert!(TagPath::parse("a//b").is_err());
    /// assert!(TagPath::parse("Tech/AI!").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TagPathError> {
        Self::parse_with_limits(raw, &Limits::default())
    }

    /// Parse and validate a tag path with custom limits
    pub fn parse_with_limits(raw: &str, limits: &Limits) -> Result<Self, TagPathError> {
        if raw.is_empty() {
            return Err(TagPathError::Empty);
        }

        if raw.len() > limits.max_path_bytes {
            return Err(TagPathError::TooLong {
                actual: raw.len(),
                max: limits.max_path_bytes,
            });
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            validate_segment(segment, limits)?;
            segments.push(segment.to_string());
        }

        Ok(TagPath { segments })
    }

    /// The segment sequence, root-first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The last segment (the node's display name)
    pub fn name(&self) -> &str {
        // segments is non-empty by construction
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The ancestor one segment shorter, absent for depth-1 paths
    pub fn parent(&self) -> Option<TagPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(TagPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// All strict non-empty prefixes, in root-to-parent order
    ///
    /// Excludes the path itself. Empty for depth-1 paths.
    pub fn ancestors(&self) -> Vec<TagPath> {
        (1..self.segments.len())
            .map(|len| TagPath {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Extend this path by one validated segment
    pub fn join(&self, segment: &str) -> Result<TagPath, TagPathError> {
        let limits = Limits::default();
        validate_segment(segment, &limits)?;

        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        let joined = TagPath { segments };

        if joined.to_string().len() > limits.max_path_bytes {
            return Err(TagPathError::TooLong {
                actual: joined.to_string().len(),
                max: limits.max_path_bytes,
            });
        }
        Ok(joined)
    }

    /// Rebuild a path from segments that were validated on a prior parse
    ///
    /// Tree traversals split stored full-path strings back into segments;
    /// those came from parsed paths, so re-validation is skipped.
    pub(crate) fn from_validated_segments(segments: Vec<String>) -> TagPath {
        TagPath { segments }
    }

    /// True iff `other` is a strict extension of this path
    pub fn is_ancestor_of(&self, other: &TagPath) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for TagPath {
    type Err = TagPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagPath::parse(s)
    }
}

impl TryFrom<String> for TagPath {
    type Error = TagPathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TagPath::parse(&s)
    }
}

impl From<TagPath> for String {
    fn from(path: TagPath) -> String {
        path.to_string()
    }
}

fn validate_segment(segment: &str, limits: &Limits) -> Result<(), TagPathError> {
    if segment.is_empty() {
        return Err(TagPathError::EmptySegment);
    }

    let chars = segment.chars().count();
    if chars > limits.max_segment_chars {
        return Err(TagPathError::SegmentTooLong {
            segment: segment.to_string(),
            actual: chars,
            max: limits.max_segment_chars,
        });
    }

    if let Some(character) = segment.chars().find(|c| !is_segment_char(*c)) {
        return Err(TagPathError::InvalidCharacter {
            segment: segment.to_string(),
            character,
        });
    }

    Ok(())
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-'
}

/// Tag path validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagPathError {
    /// Path is the empty string
    #[error("Tag path cannot be empty")]
    Empty,

    /// Path exceeds the total byte limit
    #[error("Tag path too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual path length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Path contains an empty segment (`a//b`, leading or trailing `/`)
    #[error("Tag path segments cannot be empty")]
    EmptySegment,

    /// A segment exceeds the per-segment character limit
    #[error("Tag segment '{segment}' too long: {actual} characters exceeds maximum {max}")]
    SegmentTooLong {
        /// The offending segment
        segment: String,
        /// Actual segment length in characters
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// A segment contains a character outside `[A-Za-z0-9 _-]`
    #[error("Tag segment '{segment}' contains invalid character {character:?}")]
    InvalidCharacter {
        /// The offending segment
        segment: String,
        /// The first invalid character found
        character: char,
    },
}

impl TagPathError {
    /// Stable reason code for callers that key on a string
    pub fn reason_code(&self) -> &'static str {
        match self {
            TagPathError::Empty => "empty_path",
            TagPathError::TooLong { .. } => "path_too_long",
            TagPathError::EmptySegment => "empty_segment",
            TagPathError::SegmentTooLong { .. } => "segment_too_long",
            TagPathError::InvalidCharacter { .. } => "invalid_character",
        }
    }
}
