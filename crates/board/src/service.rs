//! BoardService: the domain facade over a Store
//!
//! ## Design
//!
//! BoardService is a stateless facade. It holds no in-memory state beyond
//! an `Arc<dyn Store>` reference; every operation validates its input,
//! delegates to the store, and shapes the result. Multiple instances over
//! the same store are safe, and a service can be cloned freely across
//! threads.
//!
//! Mutations validate before touching the store: a malformed URL or tag
//! path is rejected with `Validation` and nothing is written.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use linkstacks_core::{
    validate_url, Board, BoardId, ClientId, Error, LinkId, LinkWithTags, Result, Store, TagPath,
    TagTree, ValidationError,
};

use crate::positions::plan_move;

/// Domain facade for one store
///
/// # Example
///
/// ```ignore
/// use linkstacks_board::BoardService;
/// use linkstacks_storage::MemoryStore;
/// use std::sync::Arc;
///
/// let service = BoardService::new(Arc::new(MemoryStore::new()));
/// let board = service.open_board("team/reading", None)?;
/// let link = service.add_link(board.id, "https://example.com", None, &["Tech/AI"], None)?;
/// ```
#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn Store>,
}

impl BoardService {
    /// Create a service over a store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The underlying store reference
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    // ========== Boards ==========

    /// Fetch a board by slug, creating it on first use
    ///
    /// Two actors racing on the same fresh slug both end up with the same
    /// board: the loser of the create race re-reads the winner's row.
    pub fn open_board(&self, slug_path: &str, title: Option<&str>) -> Result<Board> {
        if let Some(board) = self.store.board_by_slug(slug_path)? {
            return Ok(board);
        }
        match self.store.create_board(slug_path, title) {
            Ok(board) => Ok(board),
            Err(Error::ConcurrencyConflict(_)) => self
                .store
                .board_by_slug(slug_path)?
                .ok_or_else(|| Error::not_found("board", slug_path)),
            Err(e) => Err(e),
        }
    }

    /// Look up a board without creating it
    pub fn board(&self, slug_path: &str) -> Result<Option<Board>> {
        self.store.board_by_slug(slug_path)
    }

    /// Replace a board's display title
    pub fn update_board_title(&self, board_id: BoardId, title: Option<&str>) -> Result<()> {
        self.store.update_board_title(board_id, title)
    }

    // ========== Link mutations ==========

    /// Validate and add a link under one or more tag paths
    ///
    /// Every tag path is parsed and the URL checked before any mutation;
    /// the store then creates the link and all memberships as one logical
    /// transaction, each membership positioned at its own tag's
    /// next-available offset.
    pub fn add_link(
        &self,
        board_id: BoardId,
        url: &str,
        title: Option<&str>,
        tag_paths: &[&str],
        client_id: Option<&ClientId>,
    ) -> Result<LinkWithTags> {
        validate_url(url)?;
        if tag_paths.is_empty() {
            return Err(ValidationError::NoTagPaths.into());
        }
        let parsed: Vec<TagPath> = tag_paths
            .iter()
            .map(|raw| TagPath::parse(raw))
            .collect::<std::result::Result<_, _>>()?;

        self.store
            .create_link(board_id, url, title, client_id, &parsed)
    }

    /// Add an existing link to a tag at the next-available position
    pub fn append_to_tag(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        link_id: LinkId,
    ) -> Result<u32> {
        self.store.append_membership(board_id, tag_path, link_id)
    }

    /// Apply a complete new ordering for a tag, atomically
    ///
    /// `ordered` is the full desired sequence of every active member, as
    /// produced by [`crate::positions::plan_move`]. Fails with
    /// `ConcurrencyConflict` when the membership set changed since the
    /// caller's read; re-read and retry.
    pub fn reorder(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        ordered: &[LinkId],
    ) -> Result<()> {
        self.store.overwrite_positions(board_id, tag_path, ordered)
    }

    /// Move one link within a tag by index, reading the current order first
    ///
    /// Convenience wrapper: fetch the tag's current ordering, simulate the
    /// move, and apply the result. Returns the new ordering.
    pub fn move_link(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        from: usize,
        to: usize,
    ) -> Result<Vec<LinkId>> {
        let current: Vec<LinkId> = self
            .store
            .links_for_board(board_id, Some(tag_path))?
            .iter()
            .map(LinkWithTags::id)
            .collect();
        let moved = plan_move(&current, from, to).map_err(Error::Validation)?;
        self.store
            .overwrite_positions(board_id, tag_path, &moved)?;
        Ok(moved)
    }

    /// Remove a link's membership in one tag
    ///
    /// Remaining positions keep their values; the gap is closed by the next
    /// reorder.
    pub fn remove_tag(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        link_id: LinkId,
    ) -> Result<()> {
        self.store.remove_membership(board_id, tag_path, link_id)
    }

    /// Remove a tag and everything under it
    ///
    /// Deletes every membership at the tag path and at each of its
    /// descendants. Links themselves survive (they may live under other
    /// tags). Returns the number of memberships removed.
    pub fn remove_tag_subtree(&self, board_id: BoardId, tag_path: &TagPath) -> Result<usize> {
        let paths = self.store.tag_paths_for_board(board_id)?;
        let tree = TagTree::build(&paths);

        let mut removed = 0;
        for target in tree.descendant_paths(tag_path) {
            for link in self.store.links_for_board(board_id, Some(&target))? {
                self.store
                    .remove_membership(board_id, &target, link.id())?;
                removed += 1;
            }
        }
        debug!(tag = %tag_path, removed, "removed tag subtree");
        Ok(removed)
    }

    /// Soft-delete a link; it disappears from every view but keeps its row
    pub fn delete_link(&self, link_id: LinkId) -> Result<()> {
        self.store.soft_delete_link(link_id)
    }

    /// Replace a link's display title
    pub fn update_link_title(&self, link_id: LinkId, title: &str) -> Result<()> {
        self.store.update_link_title(link_id, title)
    }

    // ========== Views ==========

    /// Distinct tag paths currently in use on the board
    pub fn tag_paths(&self, board_id: BoardId) -> Result<Vec<TagPath>> {
        self.store.tag_paths_for_board(board_id)
    }

    /// The board's tag hierarchy, annotated with exact-path link counts
    ///
    /// Rebuilt from scratch on every call; the tree is a pure projection.
    pub fn tag_tree(&self, board_id: BoardId) -> Result<TagTree> {
        let paths = self.store.tag_paths_for_board(board_id)?;

        let mut counts: HashMap<TagPath, usize> = HashMap::new();
        for link in self.store.links_for_board(board_id, None)? {
            for membership in &link.memberships {
                *counts.entry(membership.tag_path.clone()).or_insert(0) += 1;
            }
        }

        Ok(TagTree::build_with_counts(&paths, &counts))
    }

    /// Every link with at least one active membership, each exactly once
    ///
    /// Deduplicated by link id no matter how many tags reference the link;
    /// newest first (creation time descending, id descending on ties).
    pub fn all_links(&self, board_id: BoardId) -> Result<Vec<LinkWithTags>> {
        let mut links: Vec<LinkWithTags> = self
            .store
            .links_for_board(board_id, None)?
            .into_iter()
            .filter(|link| !link.memberships.is_empty())
            .collect();
        sort_newest_first(&mut links);
        Ok(links)
    }

    /// Active links at exactly one tag path, in manual order
    ///
    /// Position ascending, link id ascending on ties; descendants of the
    /// tag are not included.
    pub fn links_for_tag(&self, board_id: BoardId, tag_path: &TagPath) -> Result<Vec<LinkWithTags>> {
        self.store.links_for_board(board_id, Some(tag_path))
    }

    /// Case-insensitive substring search over title and URL
    ///
    /// Newest first; no positional ordering applies, since results are not
    /// scoped to a single tag. An empty or whitespace-only query returns
    /// nothing.
    pub fn search(&self, board_id: BoardId, query: &str) -> Result<Vec<LinkWithTags>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<LinkWithTags> = self
            .store
            .links_for_board(board_id, None)?
            .into_iter()
            .filter(|candidate| {
                let title_match = candidate
                    .link
                    .title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle));
                title_match || candidate.link.url.to_lowercase().contains(&needle)
            })
            .collect();
        sort_newest_first(&mut matches);
        Ok(matches)
    }
}

fn sort_newest_first(links: &mut [LinkWithTags]) {
    links.sort_by(|a, b| {
        b.link
            .created_at
            .cmp(&a.link.created_at)
            .then(b.id().cmp(&a.id()))
    });
}
