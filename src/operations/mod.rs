//! Operations module
//!
//! Coordinates a commit run: form, rendering, commit and value cache

pub mod commit;

pub use commit::*;
