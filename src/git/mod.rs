//! Git operations module
//!
//! Locates the repository, inspects staged changes, resolves the author and
//! records the commit

pub mod repository;

pub use repository::*;
