//! MemoryStore: in-memory reference implementation of the Store trait
//!
//! Backed by `BTreeMap` tables behind a single `parking_lot::RwLock`, with
//! an `AtomicI64` for link-id allocation.
//!
//! # Atomicity
//!
//! Every mutating trait method acquires the write lock once for its whole
//! body. That single critical section is what makes the ledger operations
//! atomic as observed by concurrent readers:
//! - `create_link` computes max+1 per tag path and inserts all membership
//!   rows under the same lock (no partial fan-out)
//! - `append_membership`'s max+1 read and insert cannot interleave with
//!   another append to the same tag path
//! - `overwrite_positions` validates the submitted id set and rewrites all
//!   positions before any reader can observe the tag path again
//!
//! # Position gaps
//!
//! `remove_membership` deletes its row and leaves the remaining positions
//! untouched. Gaps never affect relative order; density is re-established
//! by the next `overwrite_positions`. Membership rows of soft-deleted links
//! are retained and still count toward `max_position`, so appends never
//! collide with a tombstone's row.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use linkstacks_core::{
    Board, BoardId, ClientId, Error, Link, LinkId, LinkTagMembership, LinkWithTags, Result, Store,
    TagPath,
};

#[derive(Debug, Default)]
struct Tables {
    boards: BTreeMap<BoardId, Board>,
    boards_by_slug: BTreeMap<String, BoardId>,
    links: BTreeMap<LinkId, Link>,
    /// One row per (board, tag path, link), holding the position
    memberships: BTreeMap<(BoardId, TagPath, LinkId), u32>,
}

impl Tables {
    fn tag_rows(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
    ) -> impl Iterator<Item = (LinkId, u32)> + '_ {
        self.memberships
            .range(
                (board_id, tag_path.clone(), LinkId::MIN)..=(board_id, tag_path.clone(), LinkId::MAX),
            )
            .map(|((_, _, link_id), position)| (*link_id, *position))
    }

    /// Max position over every stored row, tombstoned links included
    fn max_position_in(&self, board_id: BoardId, tag_path: &TagPath) -> Option<u32> {
        self.tag_rows(board_id, tag_path)
            .map(|(_, position)| position)
            .max()
    }

    fn next_position_in(&self, board_id: BoardId, tag_path: &TagPath) -> u32 {
        self.max_position_in(board_id, tag_path)
            .map_or(0, |max| max + 1)
    }

    fn is_active(&self, link_id: LinkId) -> bool {
        self.links
            .get(&link_id)
            .is_some_and(|link| !link.soft_deleted)
    }

    /// Link ids with an active membership at exactly this tag path, by position
    fn active_member_ids(&self, board_id: BoardId, tag_path: &TagPath) -> Vec<(LinkId, u32)> {
        let mut rows: Vec<(LinkId, u32)> = self
            .tag_rows(board_id, tag_path)
            .filter(|(link_id, _)| self.is_active(*link_id))
            .collect();
        rows.sort_by_key(|(link_id, position)| (*position, *link_id));
        rows
    }

    /// Materialize a link with its full membership fan-out
    fn link_with_tags(&self, link: &Link) -> LinkWithTags {
        let memberships = self
            .memberships
            .iter()
            .filter(|((board_id, _, link_id), _)| {
                *board_id == link.board_id && *link_id == link.id
            })
            .map(|((_, tag_path, link_id), position)| LinkTagMembership {
                link_id: *link_id,
                tag_path: tag_path.clone(),
                position: *position,
            })
            .collect();
        LinkWithTags {
            link: link.clone(),
            memberships,
        }
    }
}

/// In-memory `Store` implementation
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicI64`. Suitable as
/// the test double for the hosted datastore and as the backing store for
/// single-process embedding.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    next_link_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    ///
    /// Link ids start at 1.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_link_id: AtomicI64::new(1),
        }
    }

    fn allocate_link_id(&self) -> LinkId {
        LinkId::from_i64(self.next_link_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Store for MemoryStore {
    fn create_board(&self, slug_path: &str, title: Option<&str>) -> Result<Board> {
        let mut tables = self.tables.write();

        if tables.boards_by_slug.contains_key(slug_path) {
            return Err(Error::conflict(format!(
                "board slug already exists: {slug_path}"
            )));
        }

        let board = Board {
            id: BoardId::new(),
            slug_path: slug_path.to_string(),
            title: title.map(str::to_string),
            created_at: Utc::now(),
        };
        tables
            .boards_by_slug
            .insert(slug_path.to_string(), board.id);
        tables.boards.insert(board.id, board.clone());
        debug!(slug_path, board_id = %board.id, "created board");
        Ok(board)
    }

    fn board_by_slug(&self, slug_path: &str) -> Result<Option<Board>> {
        let tables = self.tables.read();
        Ok(tables
            .boards_by_slug
            .get(slug_path)
            .and_then(|id| tables.boards.get(id))
            .cloned())
    }

    fn update_board_title(&self, board_id: BoardId, title: Option<&str>) -> Result<()> {
        let mut tables = self.tables.write();
        let board = tables
            .boards
            .get_mut(&board_id)
            .ok_or_else(|| Error::not_found("board", board_id.to_string()))?;
        board.title = title.map(str::to_string);
        Ok(())
    }

    fn create_link(
        &self,
        board_id: BoardId,
        url: &str,
        title: Option<&str>,
        client_id: Option<&ClientId>,
        tag_paths: &[TagPath],
    ) -> Result<LinkWithTags> {
        let mut tables = self.tables.write();

        if !tables.boards.contains_key(&board_id) {
            return Err(Error::not_found("board", board_id.to_string()));
        }

        let mut distinct = Vec::new();
        let mut seen = BTreeSet::new();
        for tag_path in tag_paths {
            if seen.insert(tag_path.clone()) {
                distinct.push(tag_path.clone());
            }
        }

        let link = Link {
            id: self.allocate_link_id(),
            board_id,
            url: url.to_string(),
            title: title.map(str::to_string),
            client_id: client_id.cloned(),
            soft_deleted: false,
            created_at: Utc::now(),
        };

        // Next position is computed per tag path, not from a shared counter.
        let mut memberships = Vec::with_capacity(distinct.len());
        for tag_path in distinct {
            let position = tables.next_position_in(board_id, &tag_path);
            tables
                .memberships
                .insert((board_id, tag_path.clone(), link.id), position);
            memberships.push(LinkTagMembership {
                link_id: link.id,
                tag_path,
                position,
            });
        }
        memberships.sort_by(|a, b| a.tag_path.cmp(&b.tag_path));

        tables.links.insert(link.id, link.clone());
        debug!(link_id = %link.id, %board_id, tags = memberships.len(), "created link");
        Ok(LinkWithTags { link, memberships })
    }

    fn link_by_id(&self, link_id: LinkId) -> Result<Option<LinkWithTags>> {
        let tables = self.tables.read();
        Ok(tables
            .links
            .get(&link_id)
            .map(|link| tables.link_with_tags(link)))
    }

    fn update_link_title(&self, link_id: LinkId, title: &str) -> Result<()> {
        let mut tables = self.tables.write();
        let link = tables
            .links
            .get_mut(&link_id)
            .ok_or_else(|| Error::not_found("link", link_id.to_string()))?;
        link.title = Some(title.to_string());
        Ok(())
    }

    fn soft_delete_link(&self, link_id: LinkId) -> Result<()> {
        let mut tables = self.tables.write();
        let link = tables
            .links
            .get_mut(&link_id)
            .ok_or_else(|| Error::not_found("link", link_id.to_string()))?;
        link.soft_deleted = true;
        debug!(%link_id, "soft-deleted link");
        Ok(())
    }

    fn max_position(&self, board_id: BoardId, tag_path: &TagPath) -> Result<Option<u32>> {
        let tables = self.tables.read();
        Ok(tables.max_position_in(board_id, tag_path))
    }

    fn append_membership(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        link_id: LinkId,
    ) -> Result<u32> {
        let mut tables = self.tables.write();

        if !tables.boards.contains_key(&board_id) {
            return Err(Error::not_found("board", board_id.to_string()));
        }
        let belongs = tables
            .links
            .get(&link_id)
            .is_some_and(|link| link.board_id == board_id && !link.soft_deleted);
        if !belongs {
            return Err(Error::not_found("link", link_id.to_string()));
        }

        let key = (board_id, tag_path.clone(), link_id);
        if let Some(position) = tables.memberships.get(&key) {
            return Ok(*position);
        }

        let position = tables.next_position_in(board_id, tag_path);
        tables.memberships.insert(key, position);
        debug!(%link_id, tag = %tag_path, position, "appended membership");
        Ok(position)
    }

    fn overwrite_positions(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        ordered: &[LinkId],
    ) -> Result<()> {
        let mut tables = self.tables.write();

        let current: BTreeSet<LinkId> = tables
            .active_member_ids(board_id, tag_path)
            .into_iter()
            .map(|(link_id, _)| link_id)
            .collect();
        let submitted: BTreeSet<LinkId> = ordered.iter().copied().collect();

        if submitted.len() != ordered.len() {
            return Err(Error::conflict(format!(
                "duplicate link ids in reorder for tag '{tag_path}'"
            )));
        }
        if submitted != current {
            return Err(Error::conflict(format!(
                "reorder set does not match active memberships for tag '{tag_path}'"
            )));
        }

        for (index, link_id) in ordered.iter().enumerate() {
            tables
                .memberships
                .insert((board_id, tag_path.clone(), *link_id), index as u32);
        }
        debug!(tag = %tag_path, count = ordered.len(), "overwrote positions");
        Ok(())
    }

    fn remove_membership(
        &self,
        board_id: BoardId,
        tag_path: &TagPath,
        link_id: LinkId,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let removed = tables
            .memberships
            .remove(&(board_id, tag_path.clone(), link_id));
        if removed.is_none() {
            return Err(Error::not_found(
                "membership",
                format!("link {link_id} in '{tag_path}'"),
            ));
        }
        debug!(%link_id, tag = %tag_path, "removed membership");
        Ok(())
    }

    fn tag_paths_for_board(&self, board_id: BoardId) -> Result<Vec<TagPath>> {
        let tables = self.tables.read();
        let mut distinct = BTreeSet::new();
        for ((owner, tag_path, link_id), _) in tables.memberships.iter() {
            if *owner == board_id && tables.is_active(*link_id) {
                distinct.insert(tag_path.clone());
            }
        }
        Ok(distinct.into_iter().collect())
    }

    fn links_for_board(
        &self,
        board_id: BoardId,
        tag_path: Option<&TagPath>,
    ) -> Result<Vec<LinkWithTags>> {
        let tables = self.tables.read();

        match tag_path {
            Some(tag_path) => Ok(tables
                .active_member_ids(board_id, tag_path)
                .into_iter()
                .filter_map(|(link_id, _)| tables.links.get(&link_id))
                .map(|link| tables.link_with_tags(link))
                .collect()),
            None => Ok(tables
                .links
                .values()
                .filter(|link| link.board_id == board_id && !link.soft_deleted)
                .map(|link| tables.link_with_tags(link))
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> TagPath {
        TagPath::parse(raw).unwrap()
    }

    fn setup() -> (MemoryStore, BoardId) {
        let store = MemoryStore::new();
        let board = store.create_board("team/reading", Some("Reading")).unwrap();
        (store, board.id)
    }

    // === Boards ===

    #[test]
    fn test_create_and_fetch_board() {
        let (store, board_id) = setup();
        let board = store.board_by_slug("team/reading").unwrap().unwrap();
        assert_eq!(board.id, board_id);
        assert_eq!(board.title.as_deref(), Some("Reading"));
        assert!(store.board_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_is_a_conflict() {
        let (store, _) = setup();
        let result = store.create_board("team/reading", None);
        assert!(matches!(result, Err(Error::ConcurrencyConflict(_))));
    }

    #[test]
    fn test_update_board_title() {
        let (store, board_id) = setup();
        store.update_board_title(board_id, Some("Renamed")).unwrap();
        let board = store.board_by_slug("team/reading").unwrap().unwrap();
        assert_eq!(board.title.as_deref(), Some("Renamed"));

        store.update_board_title(board_id, None).unwrap();
        let board = store.board_by_slug("team/reading").unwrap().unwrap();
        assert_eq!(board.title, None);

        let missing = store.update_board_title(BoardId::new(), Some("x"));
        assert!(matches!(missing, Err(Error::NotFound { .. })));
    }

    // === Link creation ===

    #[test]
    fn test_create_link_fans_out_positions_per_tag() {
        let (store, board_id) = setup();

        let first = store
            .create_link(board_id, "https://a.example", None, None, &[p("Tech/AI")])
            .unwrap();
        assert_eq!(first.position_in(&p("Tech/AI")), Some(0));

        // Second link: Tech/AI continues at 1, Tech/ML starts fresh at 0
        let second = store
            .create_link(
                board_id,
                "https://b.example",
                None,
                None,
                &[p("Tech/AI"), p("Tech/ML")],
            )
            .unwrap();
        assert_eq!(second.position_in(&p("Tech/AI")), Some(1));
        assert_eq!(second.position_in(&p("Tech/ML")), Some(0));
    }

    #[test]
    fn test_create_link_dedups_tag_paths() {
        let (store, board_id) = setup();
        let link = store
            .create_link(
                board_id,
                "https://a.example",
                None,
                None,
                &[p("Tech"), p("Tech")],
            )
            .unwrap();
        assert_eq!(link.memberships.len(), 1);
    }

    #[test]
    fn test_create_link_unknown_board() {
        let store = MemoryStore::new();
        let result = store.create_link(BoardId::new(), "https://a.example", None, None, &[p("T")]);
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_link_ids_are_monotonic() {
        let (store, board_id) = setup();
        let a = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("T")])
            .unwrap();
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_client_id_recorded() {
        let (store, board_id) = setup();
        let client = ClientId::new("client_abc");
        let link = store
            .create_link(board_id, "https://a.example", None, Some(&client), &[p("T")])
            .unwrap();
        assert_eq!(link.link.client_id, Some(client));
    }

    // === Append ===

    #[test]
    fn test_append_assigns_max_plus_one() {
        let (store, board_id) = setup();
        let a = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("Other")])
            .unwrap();

        assert_eq!(store.append_membership(board_id, &p("T"), b.id()).unwrap(), 1);
        // Idempotent on an existing membership
        assert_eq!(store.append_membership(board_id, &p("T"), a.id()).unwrap(), 0);
    }

    #[test]
    fn test_append_rejects_soft_deleted_link() {
        let (store, board_id) = setup();
        let link = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        store.soft_delete_link(link.id()).unwrap();

        let result = store.append_membership(board_id, &p("Other"), link.id());
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_tombstone_rows_still_count_toward_max() {
        let (store, board_id) = setup();
        let a = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("T")])
            .unwrap();
        store.soft_delete_link(b.id()).unwrap();

        // b's row (position 1) is retained, so the next append goes to 2
        let c = store
            .create_link(board_id, "https://c.example", None, None, &[p("T")])
            .unwrap();
        assert_eq!(c.position_in(&p("T")), Some(2));
        assert_eq!(store.max_position(board_id, &p("T")).unwrap(), Some(2));
        let _ = a;
    }

    // === Reorder ===

    #[test]
    fn test_overwrite_positions_happy_path() {
        let (store, board_id) = setup();
        let ids: Vec<LinkId> = (0..3)
            .map(|i| {
                store
                    .create_link(board_id, &format!("https://{i}.example"), None, None, &[p("T")])
                    .unwrap()
                    .id()
            })
            .collect();

        let reordered = vec![ids[1], ids[0], ids[2]];
        store
            .overwrite_positions(board_id, &p("T"), &reordered)
            .unwrap();

        let links = store.links_for_board(board_id, Some(&p("T"))).unwrap();
        let order: Vec<LinkId> = links.iter().map(LinkWithTags::id).collect();
        assert_eq!(order, reordered);
    }

    #[test]
    fn test_overwrite_positions_rejects_stale_set() {
        let (store, board_id) = setup();
        let a = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("T")])
            .unwrap();

        // Missing an id
        let result = store.overwrite_positions(board_id, &p("T"), &[a.id()]);
        assert!(matches!(result, Err(Error::ConcurrencyConflict(_))));

        // Unknown id
        let result =
            store.overwrite_positions(board_id, &p("T"), &[a.id(), LinkId::from_i64(999)]);
        assert!(matches!(result, Err(Error::ConcurrencyConflict(_))));

        // Duplicate id
        let result = store.overwrite_positions(board_id, &p("T"), &[a.id(), a.id()]);
        assert!(matches!(result, Err(Error::ConcurrencyConflict(_))));

        // Valid set still applies afterwards
        store
            .overwrite_positions(board_id, &p("T"), &[b.id(), a.id()])
            .unwrap();
    }

    #[test]
    fn test_overwrite_positions_empty_tag_is_noop() {
        let (store, board_id) = setup();
        store.overwrite_positions(board_id, &p("Empty"), &[]).unwrap();
    }

    // === Remove ===

    #[test]
    fn test_remove_membership_leaves_gap() {
        let (store, board_id) = setup();
        let ids: Vec<LinkId> = (0..3)
            .map(|i| {
                store
                    .create_link(board_id, &format!("https://{i}.example"), None, None, &[p("T")])
                    .unwrap()
                    .id()
            })
            .collect();

        store.remove_membership(board_id, &p("T"), ids[1]).unwrap();

        let links = store.links_for_board(board_id, Some(&p("T"))).unwrap();
        let positions: Vec<u32> = links
            .iter()
            .map(|l| l.position_in(&p("T")).unwrap())
            .collect();
        // Gap at 1 is tolerated; order unchanged
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_remove_missing_membership_is_not_found() {
        let (store, board_id) = setup();
        let result = store.remove_membership(board_id, &p("T"), LinkId::from_i64(1));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    // === Listings ===

    #[test]
    fn test_tag_paths_for_board_excludes_tombstones() {
        let (store, board_id) = setup();
        store
            .create_link(board_id, "https://a.example", None, None, &[p("Tech/AI")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("Life")])
            .unwrap();
        store.soft_delete_link(b.id()).unwrap();

        assert_eq!(store.tag_paths_for_board(board_id).unwrap(), vec![p("Tech/AI")]);
    }

    #[test]
    fn test_links_for_board_filtered_orders_by_position_then_id() {
        let (store, board_id) = setup();
        let a = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("T")])
            .unwrap();

        store
            .overwrite_positions(board_id, &p("T"), &[b.id(), a.id()])
            .unwrap();
        let links = store.links_for_board(board_id, Some(&p("T"))).unwrap();
        let order: Vec<LinkId> = links.iter().map(LinkWithTags::id).collect();
        assert_eq!(order, vec![b.id(), a.id()]);
    }

    #[test]
    fn test_links_for_board_unfiltered_excludes_soft_deleted() {
        let (store, board_id) = setup();
        let a = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        let b = store
            .create_link(board_id, "https://b.example", None, None, &[p("T")])
            .unwrap();
        store.soft_delete_link(b.id()).unwrap();

        let links = store.links_for_board(board_id, None).unwrap();
        let ids: Vec<LinkId> = links.iter().map(LinkWithTags::id).collect();
        assert_eq!(ids, vec![a.id()]);
    }

    #[test]
    fn test_soft_delete_is_idempotent() {
        let (store, board_id) = setup();
        let link = store
            .create_link(board_id, "https://a.example", None, None, &[p("T")])
            .unwrap();
        store.soft_delete_link(link.id()).unwrap();
        store.soft_delete_link(link.id()).unwrap();
        assert!(store.link_by_id(link.id()).unwrap().unwrap().link.soft_deleted);
    }
}
