//! Size limits for tag paths
//!
//! This module defines the configurable bounds enforced by tag-path parsing.
//! Violations surface as `TagPathError` with appropriate reason codes.
//!
//! The defaults match the wire contract of the hosted datastore the board
//! UI talks to: segments of 1-24 characters, whole paths of at most 200
//! bytes. Custom limits exist primarily for tests.

/// Size limits for tag paths
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum characters per path segment (default: 24)
    pub max_segment_chars: usize,

    /// Maximum total path length in bytes (default: 200)
    pub max_path_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_segment_chars: 24,
            max_path_bytes: 200,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    ///
    /// Useful for unit tests that exercise limit enforcement without
    /// constructing long paths.
    pub fn with_small_limits() -> Self {
        Limits {
            max_segment_chars: 4,
            max_path_bytes: 16,
        }
    }
}
