//! # `Commity`
//!
//! `Commity` is a command-line tool that asks a configurable set of questions
//! and turns the answers into a Git commit message.
//!
//! ## Features
//! - Text, choice and yes/no fields declared in `.commity.yaml`.
//! - Length and pattern constraints on text answers, re-asked until valid.
//! - Commit message rendered through a Go-style template.
//! - Remembers selected answers per repository between runs.
//!
//! ## Usage
//!
//! ```sh
//! git add -p
//! commity
//! ```
//!
//! **Non-interactive:**
//! ```sh
//! commity --yes --set type=fix --set header="correct off-by-one in parser"
//! ```
//!
//! See `commity --help` for more options and details.

use anyhow::Result;
use clap::Parser as _;
use commity::cli::Args;
use commity::error::CommityError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Prompts own the terminal; keep logs quiet unless asked for
    let log_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match commity::run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            let commity_error = err.downcast_ref::<CommityError>();
            if commity_error.is_some_and(CommityError::is_abort) {
                println!("Commit canceled - Goodbye!");
            } else {
                // Alternate form prints the whole context chain
                error!("{err:#}");
            }
            std::process::exit(commity_error.map_or(1, CommityError::exit_code));
        }
    }
}
