//! Storage layer for LinkStacks
//!
//! Provides `MemoryStore`, the in-memory reference implementation of the
//! `linkstacks_core::Store` trait. A hosted relational backend implements
//! the same trait; upper layers never know the difference.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::MemoryStore;
