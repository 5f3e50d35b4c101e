//! Utility functions module
//!
//! Path helpers shared by the configuration locator and the value cache

pub mod path;
