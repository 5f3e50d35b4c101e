//! `Commity` - Structured Git commit messages from a configurable form
//!
//! This library loads a YAML form definition (text, choice and boolean
//! fields), collects values through the terminal, renders them through the
//! configured commit template and commits the staged changes.

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod git;
pub mod operations;
pub mod render;
pub mod store;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use form::TerminalPrompter;
use operations::{CommitOperation, CommitOutcome};
use system::RealSystem;

/// Main entry point for the commity library
pub fn run(args: &Args) -> Result<()> {
    let system = RealSystem::new();
    let operation = CommitOperation::new(args, &system)?;
    let mut prompter = TerminalPrompter::new();

    // Output to stdout (not using logging)
    match operation.execute(&mut prompter)? {
        CommitOutcome::Committed { ref message, .. } => {
            println!("Commit successful!");
            println!("{message}");
        }
        outcome => println!("{}", outcome.message()),
    }

    Ok(())
}
