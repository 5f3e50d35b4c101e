//! Prompt abstraction
//!
//! The collection sequence talks to the user only through [`Prompter`], so it
//! can be driven by the terminal in production and by a script in tests.

use crate::config::{BooleanEntry, ChoiceEntry, TextEntry};
use crate::error::CommityError;
use crate::form::validate::TextRules;
use dialoguer::{Confirm, Editor, Input, Select};
use std::io;
use std::path::PathBuf;

/// Summary shown before the first field
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Overview {
    /// Repository the commit goes to
    pub repository: PathBuf,
    /// Number of staged changes
    pub staged_changes: usize,
}

impl Overview {
    #[must_use]
    #[inline]
    pub const fn new(repository: PathBuf, staged_changes: usize) -> Self {
        Self {
            repository,
            staged_changes,
        }
    }
}

/// User interaction for one form run
///
/// Every method blocks until the user answers. Cancellation is reported as
/// `CommityError::UserAborted`.
pub trait Prompter {
    /// Show the overview and ask whether to continue
    fn overview(&mut self, overview: &Overview) -> Result<(), CommityError>;

    /// Ask for a text value, seeded with `initial`
    ///
    /// Implementations may validate inline with `rules`; the caller checks
    /// the answer again either way.
    fn text(
        &mut self,
        entry: &TextEntry,
        initial: &str,
        rules: &TextRules<'_>,
    ) -> Result<String, CommityError>;

    /// Ask for one of the entry's options, starting on option `initial`
    ///
    /// Returns the selected option's value.
    fn choice(&mut self, entry: &ChoiceEntry, initial: usize) -> Result<String, CommityError>;

    /// Ask a yes/no question
    fn confirm(&mut self, entry: &BooleanEntry, initial: bool) -> Result<bool, CommityError>;

    /// Tell the user why an answer was rejected before asking again
    fn invalid(&mut self, error: &CommityError);
}

/// Terminal prompter built on `dialoguer`
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct TerminalPrompter;

impl TerminalPrompter {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    fn describe(description: &str) {
        if !description.is_empty() {
            eprintln!("{description}");
        }
    }
}

impl Prompter for TerminalPrompter {
    fn overview(&mut self, overview: &Overview) -> Result<(), CommityError> {
        eprintln!("Repository: {}", overview.repository.display());
        eprintln!("Staged changes: {}", overview.staged_changes);

        let proceed = Confirm::new()
            .with_prompt("Continue?")
            .default(true)
            .interact_opt()
            .map_err(from_dialoguer)?;

        match proceed {
            Some(true) => Ok(()),
            Some(false) | None => Err(CommityError::UserAborted),
        }
    }

    fn text(
        &mut self,
        entry: &TextEntry,
        initial: &str,
        rules: &TextRules<'_>,
    ) -> Result<String, CommityError> {
        Self::describe(&entry.description);

        if entry.multi_line {
            eprintln!("{} (opening editor)", entry.title());
            let edited = Editor::new()
                .require_save(false)
                .edit(initial)
                .map_err(from_dialoguer)?;
            return edited
                .map(|text| text.trim_end_matches(['\n', '\r']).to_owned())
                .ok_or(CommityError::UserAborted);
        }

        Input::<String>::new()
            .with_prompt(entry.title())
            .with_initial_text(initial)
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                rules.check(input).map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(from_dialoguer)
    }

    fn choice(&mut self, entry: &ChoiceEntry, initial: usize) -> Result<String, CommityError> {
        Self::describe(&entry.description);

        let labels: Vec<&str> = entry
            .choices
            .iter()
            .map(|choice| {
                if choice.label.is_empty() {
                    choice.value.as_str()
                } else {
                    choice.label.as_str()
                }
            })
            .collect();

        let selected = Select::new()
            .with_prompt(entry.title())
            .items(&labels)
            .default(initial)
            .interact_opt()
            .map_err(from_dialoguer)?
            .ok_or(CommityError::UserAborted)?;

        entry
            .choices
            .get(selected)
            .map(|choice| choice.value.clone())
            .ok_or_else(|| CommityError::prompt(format!("invalid selection {selected}")))
    }

    fn confirm(&mut self, entry: &BooleanEntry, initial: bool) -> Result<bool, CommityError> {
        Self::describe(&entry.description);

        Confirm::new()
            .with_prompt(entry.title())
            .default(initial)
            .interact_opt()
            .map_err(from_dialoguer)?
            .ok_or(CommityError::UserAborted)
    }

    fn invalid(&mut self, error: &CommityError) {
        eprintln!("{error}");
    }
}

/// Ctrl-C while a prompt owns the terminal surfaces as an interrupted read
fn from_dialoguer(error: dialoguer::Error) -> CommityError {
    match error {
        dialoguer::Error::IO(ref e) if e.kind() == io::ErrorKind::Interrupted => {
            CommityError::UserAborted
        }
        other => CommityError::prompt(other.to_string()),
    }
}
