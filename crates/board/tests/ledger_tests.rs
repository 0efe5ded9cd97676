//! Ordered Membership Ledger Integration Tests
//!
//! Tests for the per-(board, tag path) position ordering: append density,
//! independent per-tag counters, atomic batch reorder, and the lazy
//! position-gap policy on removal.

use std::sync::Arc;

use linkstacks_board::BoardService;
use linkstacks_core::{BoardId, Error, LinkId, TagPath};
use linkstacks_storage::MemoryStore;

fn setup() -> (BoardService, BoardId) {
    let service = BoardService::new(Arc::new(MemoryStore::new()));
    let board = service.open_board("team/reading", None).unwrap();
    (service, board.id)
}

fn p(raw: &str) -> TagPath {
    TagPath::parse(raw).unwrap()
}

fn add(service: &BoardService, board_id: BoardId, tags: &[&str]) -> LinkId {
    service
        .add_link(board_id, "https://example.com/x", None, tags, None)
        .unwrap()
        .id()
}

fn positions(service: &BoardService, board_id: BoardId, tag: &TagPath) -> Vec<(LinkId, u32)> {
    service
        .links_for_tag(board_id, tag)
        .unwrap()
        .iter()
        .map(|l| (l.id(), l.position_in(tag).unwrap()))
        .collect()
}

/// N appends on an empty tag produce exactly positions {0, 1, ..., N-1}
#[test]
fn test_append_positions_are_dense_from_zero() {
    let (service, board_id) = setup();
    let tag = p("Tech/AI");

    let ids: Vec<LinkId> = (0..5).map(|_| add(&service, board_id, &["Tech/AI"])).collect();

    let rows = positions(&service, board_id, &tag);
    assert_eq!(rows.len(), 5);
    for (i, (link_id, position)) in rows.iter().enumerate() {
        assert_eq!(*position, i as u32);
        assert_eq!(*link_id, ids[i]);
    }
}

/// A link added under two tags gets an independent position per tag
#[test]
fn test_multi_tag_positions_are_independent() {
    let (service, board_id) = setup();

    // Seed Tech/AI with two links so its counter is ahead of Tech/ML's
    add(&service, board_id, &["Tech/AI"]);
    add(&service, board_id, &["Tech/AI"]);

    let link = service
        .add_link(
            board_id,
            "https://example.com/both",
            None,
            &["Tech/AI", "Tech/ML"],
            None,
        )
        .unwrap();

    assert_eq!(link.position_in(&p("Tech/AI")), Some(2));
    assert_eq!(link.position_in(&p("Tech/ML")), Some(0));
}

/// Reorder assigns position = index over the submitted sequence
#[test]
fn test_reorder_applies_submitted_sequence() {
    let (service, board_id) = setup();
    let tag = p("T");
    let a = add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);
    let c = add(&service, board_id, &["T"]);

    service.reorder(board_id, &tag, &[b, a, c]).unwrap();

    assert_eq!(positions(&service, board_id, &tag), vec![(b, 0), (a, 1), (c, 2)]);
}

/// Applying the same reorder twice is a no-op the second time
#[test]
fn test_reorder_is_idempotent() {
    let (service, board_id) = setup();
    let tag = p("T");
    let a = add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);
    let c = add(&service, board_id, &["T"]);

    let target = vec![c, a, b];
    service.reorder(board_id, &tag, &target).unwrap();
    let first = positions(&service, board_id, &tag);
    service.reorder(board_id, &tag, &target).unwrap();
    assert_eq!(positions(&service, board_id, &tag), first);
}

/// A reorder with a stale id set is rejected whole; nothing moves
#[test]
fn test_reorder_conflict_leaves_positions_untouched() {
    let (service, board_id) = setup();
    let tag = p("T");
    let a = add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);

    let before = positions(&service, board_id, &tag);
    let stale = vec![b, a, LinkId::from_i64(9999)];
    let result = service.reorder(board_id, &tag, &stale);
    assert!(matches!(result, Err(Error::ConcurrencyConflict(_))));
    assert_eq!(positions(&service, board_id, &tag), before);
}

/// move_link reads the current order, simulates the drag, and applies it
#[test]
fn test_move_link_by_index() {
    let (service, board_id) = setup();
    let tag = p("T");
    let a = add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);
    let c = add(&service, board_id, &["T"]);

    let new_order = service.move_link(board_id, &tag, 2, 0).unwrap();
    assert_eq!(new_order, vec![c, a, b]);
    assert_eq!(positions(&service, board_id, &tag), vec![(c, 0), (a, 1), (b, 2)]);

    let oob = service.move_link(board_id, &tag, 7, 0);
    assert!(matches!(oob, Err(Error::Validation(_))));
}

/// Removal tolerates gaps: order survives, density does not
#[test]
fn test_remove_leaves_gap_and_preserves_order() {
    let (service, board_id) = setup();
    let tag = p("T");
    let a = add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);
    let c = add(&service, board_id, &["T"]);

    service.remove_tag(board_id, &tag, b).unwrap();

    assert_eq!(positions(&service, board_id, &tag), vec![(a, 0), (c, 2)]);
}

/// An explicit reorder after removal restores density
#[test]
fn test_reorder_restores_density_after_remove() {
    let (service, board_id) = setup();
    let tag = p("T");
    let a = add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);
    let c = add(&service, board_id, &["T"]);
    service.remove_tag(board_id, &tag, b).unwrap();

    service.reorder(board_id, &tag, &[c, a]).unwrap();

    assert_eq!(positions(&service, board_id, &tag), vec![(c, 0), (a, 1)]);
}

/// Appending to an existing tag continues after the highest position,
/// gaps included
#[test]
fn test_append_after_remove_continues_past_gap() {
    let (service, board_id) = setup();
    let tag = p("T");
    add(&service, board_id, &["T"]);
    let b = add(&service, board_id, &["T"]);
    service.remove_tag(board_id, &tag, b).unwrap();

    // Max surviving position is 0, but b's removal left the tag at max 0;
    // a fresh link lands at 1
    let c = service
        .add_link(board_id, "https://example.com/c", None, &["T"], None)
        .unwrap();
    assert_eq!(c.position_in(&tag), Some(1));
}

/// append_to_tag places an existing link at the tag's next offset
#[test]
fn test_append_existing_link_to_new_tag() {
    let (service, board_id) = setup();
    let a = add(&service, board_id, &["Tech/AI"]);
    add(&service, board_id, &["Tech/ML"]);

    let position = service.append_to_tag(board_id, &p("Tech/ML"), a).unwrap();
    assert_eq!(position, 1);

    let rows = positions(&service, board_id, &p("Tech/ML"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], (a, 1));
}

/// Removing a membership the link does not hold is surfaced, not silent
#[test]
fn test_remove_missing_membership_is_not_found() {
    let (service, board_id) = setup();
    let a = add(&service, board_id, &["Tech/AI"]);

    let result = service.remove_tag(board_id, &p("Tech/ML"), a);
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

/// Subtree removal clears the tag and all descendants, nothing else
#[test]
fn test_remove_tag_subtree() {
    let (service, board_id) = setup();
    let a = add(&service, board_id, &["Tech/AI", "Life"]);
    let b = add(&service, board_id, &["Tech/AI/Agents"]);
    let c = add(&service, board_id, &["Tech"]);

    let removed = service.remove_tag_subtree(board_id, &p("Tech/AI")).unwrap();
    assert_eq!(removed, 2);

    let remaining = service.tag_paths(board_id).unwrap();
    assert_eq!(remaining, vec![p("Life"), p("Tech")]);

    // Links survive their membership removal
    assert!(service.all_links(board_id).unwrap().iter().any(|l| l.id() == a));
    assert!(service.store().link_by_id(b).unwrap().is_some());
    let _ = c;
}
