//! Core types for LinkStacks
//!
//! This module defines the foundational row and identifier types:
//! - BoardId: opaque board identity
//! - LinkId: integer link identity, allocated by the store
//! - ClientId: caller-supplied attribution token for anonymous authorship
//! - Board, Link, LinkTagMembership, LinkWithTags: the row shapes the
//!   persistence collaborator reads and writes

use crate::tag_path::TagPath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a board
///
/// A BoardId wraps a UUID v4. Boards are created once by the persistence
/// collaborator on first use of a slug path and never deleted within this
/// core's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardId(Uuid);

impl BoardId {
    /// Create a new random BoardId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a BoardId from a string representation
    ///
    /// Accepts standard UUID format. Returns None if the string is not a
    /// valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer identifier for a link, allocated monotonically by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(i64);

impl LinkId {
    /// Smallest representable id; used as a range scan bound
    pub const MIN: LinkId = LinkId(i64::MIN);
    /// Largest representable id; used as a range scan bound
    pub const MAX: LinkId = LinkId(i64::MAX);

    /// Wrap a raw integer id
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer id
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque attribution token for anonymous authorship
///
/// Supplied by the caller on mutating operations and recorded verbatim.
/// The core keeps no ambient identity state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap a caller-supplied token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named link-curation board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Board identity
    pub id: BoardId,
    /// Canonical slug path; pre-validated, opaque, immutable once created
    pub slug_path: String,
    /// Optional display title; the only mutable attribute
    pub title: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A curated link on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link identity
    pub id: LinkId,
    /// Owning board
    pub board_id: BoardId,
    /// The stored URL
    pub url: String,
    /// Optional display title
    pub title: Option<String>,
    /// Attribution token supplied at creation, if any
    pub client_id: Option<ClientId>,
    /// Tombstone flag; soft-deleted links are excluded from every view but
    /// retain their row
    pub soft_deleted: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Join row between a link and one tag path, scoped to one board
///
/// Each membership carries its own position counter, independent per tag
/// path: a link's position in `Tech/AI` is unrelated to its position in
/// `Tech/ML`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTagMembership {
    /// The member link
    pub link_id: LinkId,
    /// The tag path the link belongs to
    pub tag_path: TagPath,
    /// Zero-based manual ordering within (board, tag path)
    pub position: u32,
}

/// A link together with all of its tag memberships
///
/// The materialized shape the views return: one row per link, with the full
/// membership fan-out attached regardless of which tag the view was scoped
/// to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkWithTags {
    /// The link row
    pub link: Link,
    /// Every membership of the link, ordered by tag path
    pub memberships: Vec<LinkTagMembership>,
}

impl LinkWithTags {
    /// The link's id
    pub fn id(&self) -> LinkId {
        self.link.id
    }

    /// Position of this link under the given tag path, if it is a member
    pub fn position_in(&self, tag_path: &TagPath) -> Option<u32> {
        self.memberships
            .iter()
            .find(|m| &m.tag_path == tag_path)
            .map(|m| m.position)
    }

    /// Tag paths this link is a member of, in membership order
    pub fn tag_paths(&self) -> impl Iterator<Item = &TagPath> {
        self.memberships.iter().map(|m| &m.tag_path)
    }
}
