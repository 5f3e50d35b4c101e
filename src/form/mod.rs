//! Form runtime module
//!
//! Holds the values of one run, merges overrides and cached values over the
//! defaults, validates text answers and drives the prompt sequence.

pub mod collect;
pub mod prompt;
pub mod validate;
pub mod values;

pub use collect::{accept_all, collect};
pub use prompt::{Overview, Prompter, TerminalPrompter};
pub use validate::{TextRules, validate_text};
pub use values::{FormValues, Overrides, coerce};
