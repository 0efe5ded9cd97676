//! The persistence collaborator trait
//!
//! This module defines the `Store` trait that the board layer is written
//! against. It abstracts the hosted relational datastore behind the small
//! set of operations the tag/position core needs, so the in-memory
//! reference implementation and a real backend are interchangeable.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync). Each mutating method is atomic
//! as observed by any concurrent reader of the same tag path — readers
//! never see a partially applied position renumbering.

use crate::error::Result;
use crate::tag_path::TagPath;
use crate::types::{Board, BoardId, ClientId, LinkId, LinkWithTags};

/// Storage abstraction for boards, links, and tag memberships
///
/// Implementations supply the atomicity this core relies on:
/// - `create_link` computes next-available position per tag path and
///   inserts all membership rows as one logical transaction
/// - `append_membership`'s max+1 read-then-insert is serialized per tag
///   path
/// - `overwrite_positions` applies a full batch or nothing
pub trait Store: Send + Sync {
    /// Create a board for a pre-validated slug path
    ///
    /// # Errors
    ///
    /// Returns `ConcurrencyConflict` if a board with this slug already
    /// exists (two actors raced on first use; the loser re-reads).
    fn create_board(&self, slug_path: &str, title: Option<&str>) -> Result<Board>;

    /// Look up a board by its slug path
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn board_by_slug(&self, slug_path: &str) -> Result<Option<Board>>;

    /// Replace a board's display title
    ///
    /// The slug path is immutable; the title is the only mutable attribute.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the board does not exist.
    fn update_board_title(&self, board_id: BoardId, title: Option<&str>) -> Result<()>;

    /// Create a link with its initial tag memberships, atomically
    ///
    /// Assigns the link id, computes `max position + 1` independently for
    /// every supplied tag path (0 on an empty tag), and inserts one
    /// membership row per path. Either the link and all memberships are
    /// created, or nothing is. Duplicate paths in the input collapse to
    /// one membership.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the board does not exist.
    fn create_link(
        &self,
        board_id: BoardId,
        url: &str,
        title: Option<&str>,
        client_id: Option<&ClientId>,
        tag_paths: &[TagPath],
    ) -> Result<LinkWithTags>;

    /// Fetch a link with its membership fan-out
    ///
    /// Soft-deleted links are returned here (the row exists); views are
    /// responsible for exclusion.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn link_by_id(&self, link_id: LinkId) -> Result<Option<LinkWithTags>>;

    /// Replace a link's display title
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link does not exist.
    fn update_link_title(&self, link_id: LinkId, title: &str) -> Result<()>;

    /// Soft-delete a link (tombstone, not hard delete)
    ///
    /// The row and its membership rows are retained but excluded from every
    /// view. Idempotent: deleting an already-deleted link is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link does not exist.
    fn soft_delete_link(&self, link_id: LinkId) -> Result<()>;

    /// Current maximum position for a tag path, `None` when no rows exist
    ///
    /// Tombstoned links' membership rows count toward the maximum, so a
    /// fresh append can never collide with a retained row.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn max_position(&self, board_id: BoardId, tag_path: &TagPath) -> Result<Option<u32>>;

    /// Add a link to a tag at the next-available position
    ///
    /// The max+1 read and the insert happen as one atomic step per tag
    /// path; concurrent appends to the same tag cannot collide. Returns the
    /// assigned position. Idempotent: if the membership already exists, its
    /// current position is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the board or link does not exist or the link
    /// is soft-deleted.
    fn append_membership(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        link_id: LinkId,
    ) -> Result<u32>;

    /// Batch-overwrite positions for one tag path, atomically
    ///
    /// `ordered` must be the complete desired ordering of every currently
    /// active membership under the tag path; each id is assigned
    /// `position = index`. All positions update or none do.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrencyConflict` if `ordered` is not exactly a
    /// permutation of the current active membership set (a concurrent add,
    /// remove, or delete slipped in between the caller's read and this
    /// write) — the caller re-reads and retries.
    fn overwrite_positions(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        ordered: &[LinkId],
    ) -> Result<()>;

    /// Remove one membership row
    ///
    /// Remaining positions are left untouched: deletion tolerates gaps, and
    /// density is re-established only by the next `overwrite_positions`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such membership exists.
    fn remove_membership(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        link_id: LinkId,
    ) -> Result<()>;

    /// Distinct tag paths with at least one active membership on the board
    ///
    /// Sorted by segment-wise path order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn tag_paths_for_board(&self, board_id: BoardId) -> Result<Vec<TagPath>>;

    /// Active links on a board, optionally filtered to one exact tag path
    ///
    /// With a filter, results carry only links holding a membership at
    /// exactly that path (descendants excluded), ordered by that tag's
    /// position ascending with link id as tie-break. Without a filter,
    /// every active link appears exactly once, in unspecified order —
    /// callers impose their own total order. Each returned row carries the
    /// link's full membership fan-out.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn links_for_board(
        &self,
        board_id: BoardId,
        tag_path: Option<&TagPath>,
    ) -> Result<Vec<LinkWithTags>>;
}
