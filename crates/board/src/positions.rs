//! Position planning for drag-and-drop reordering
//!
//! The ledger's reorder operation takes the complete desired ordering; it
//! performs no move semantics of its own. These helpers are the caller-side
//! piece: simulate the move locally (remove at the source index, re-insert
//! at the destination, untouched elements keep their relative order) and
//! hand the full list to the store.

use linkstacks_core::{LinkId, TagPath, ValidationError};

/// One position assignment within a batch overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    /// The link being positioned
    pub link_id: LinkId,
    /// The tag path the position is scoped to
    pub tag_path: TagPath,
    /// The new zero-based position
    pub position: u32,
}

/// Simulate a drag move and return the full new ordering
///
/// Removes the element at `from` and re-inserts it at `to`; every other
/// element keeps its relative order. `to` is interpreted against the list
/// after removal, matching how drop targets report indices.
///
/// # Errors
///
/// Returns `IndexOutOfRange` if either index is outside the list.
pub fn plan_move(
    ordered: &[LinkId],
    from: usize,
    to: usize,
) -> Result<Vec<LinkId>, ValidationError> {
    if from >= ordered.len() {
        return Err(ValidationError::IndexOutOfRange {
            index: from,
            len: ordered.len(),
        });
    }
    if to >= ordered.len() {
        return Err(ValidationError::IndexOutOfRange {
            index: to,
            len: ordered.len(),
        });
    }

    let mut moved = ordered.to_vec();
    let element = moved.remove(from);
    moved.insert(to, element);
    Ok(moved)
}

/// Assign `position = index` across a full ordering
///
/// Produces the batch the store's atomic overwrite consumes.
pub fn normalize_positions(tag_path: &TagPath, ordered: &[LinkId]) -> Vec<PositionUpdate> {
    ordered
        .iter()
        .enumerate()
        .map(|(index, link_id)| PositionUpdate {
            link_id: *link_id,
            tag_path: tag_path.clone(),
            position: index as u32,
        })
        .collect()
}

/// Next-available position after the given existing positions
///
/// `0` when no positions exist yet, otherwise max + 1.
pub fn next_position(existing: &[u32]) -> u32 {
    existing.iter().max().map_or(0, |max| max + 1)
}
