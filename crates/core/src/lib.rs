//! Core types and traits for LinkStacks
//!
//! This crate defines the foundational pieces used throughout the system:
//! - TagPath: validated slash-delimited hierarchical tag paths
//! - TagTree: the navigable hierarchy projected from a board's tag set
//! - BoardId / LinkId / ClientId and the Board / Link / membership rows
//! - Error: the error taxonomy (validation, not-found, conflict, storage)
//! - Store: the persistence collaborator trait
//! - Limits: configurable tag-path bounds

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod tag_path;
pub mod tag_tree;
pub mod traits;
pub mod types;
pub mod url;

// Re-export commonly used types and traits
pub use error::{Error, Result, ValidationError};
pub use limits::Limits;
pub use tag_path::{TagPath, TagPathError};
pub use tag_tree::{breadcrumbs, parent_paths, Breadcrumb, TagNode, TagTree};
pub use traits::Store;
pub use types::{Board, BoardId, ClientId, Link, LinkId, LinkTagMembership, LinkWithTags};
pub use self::url::{validate_url, UrlError};
