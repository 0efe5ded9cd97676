//! Board layer for LinkStacks
//!
//! Provides the domain surface consumed by a UI collaborator:
//! - **BoardService**: stateless facade over a `Store` for all mutations
//!   and views (add, reorder, remove, delete, search, tag tree)
//! - **positions**: pure planning helpers that turn a drag move into the
//!   complete ordering the atomic reorder consumes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod positions;
pub mod service;

pub use positions::{next_position, normalize_positions, plan_move, PositionUpdate};
pub use service::BoardService;
