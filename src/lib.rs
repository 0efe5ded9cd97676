//! LinkStacks - collaborative link-curation core
//!
//! Users create named boards, add URLs to them, and organize those URLs
//! with hierarchical slash-delimited tags (`Tech/AI/Agents`). A link can
//! belong to many tag paths at once, each membership with its own manual
//! ordering within its tag.
//!
//! # Quick Start
//!
//! ```
//! use linkstacks::{BoardService, MemoryStore};
//! use std::sync::Arc;
//!
//! # fn main() -> linkstacks::Result<()> {
//! let service = BoardService::new(Arc::new(MemoryStore::new()));
//!
//! let board = service.open_board("team/reading", Some("Reading list"))?;
//! let link = service.add_link(
//!     board.id,
//!     "https://example.com/post",
//!     Some("A post"),
//!     &["Tech/AI", "Tech/ML"],
//!     None,
//! )?;
//!
//! let tree = service.tag_tree(board.id)?;
//! assert!(tree.find(&"Tech/AI".parse().unwrap()).is_some());
//! # let _ = link;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The workspace is layered: `linkstacks-core` (types, tag tree, the
//! `Store` trait), `linkstacks-storage` (the in-memory reference store),
//! and `linkstacks-board` (the `BoardService` facade and position
//! planning). This crate re-exports the public surface.

// Re-export the public API
pub use linkstacks_board::{
    next_position, normalize_positions, plan_move, BoardService, PositionUpdate,
};
pub use linkstacks_core::{
    breadcrumbs, parent_paths, validate_url, Board, BoardId, Breadcrumb, ClientId, Error, Limits,
    Link, LinkId, LinkTagMembership, LinkWithTags, Result, Store, TagNode, TagPath, TagPathError,
    TagTree, UrlError, ValidationError,
};
pub use linkstacks_storage::MemoryStore;
