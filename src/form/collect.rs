//! Collection sequence
//!
//! Overview (optional), then every field in declared order. Any cancellation
//! ends the sequence with `UserAborted` and discards the answers.

use crate::config::{Configuration, Entry, FieldValue};
use crate::error::CommityError;
use crate::form::FormValues;
use crate::form::prompt::{Overview, Prompter};
use crate::form::validate::TextRules;
use tracing::debug;

/// Ask the user for every field, seeding each prompt with its merged value
///
/// # Errors
///
/// Returns an error if:
/// - The user cancels (`UserAborted`)
/// - A text pattern does not compile (`PatternCompile`)
/// - The prompt itself fails
pub fn collect(
    config: &Configuration,
    mut values: FormValues,
    overview: &Overview,
    prompter: &mut dyn Prompter,
) -> Result<FormValues, CommityError> {
    if config.overview {
        prompter.overview(overview)?;
    }

    for entry in &config.entries {
        let name = entry.name();
        let answer = match *entry {
            Entry::Text(ref text) => {
                let rules = TextRules::new(text)?;
                let mut current = values.get_str(name).to_owned();
                loop {
                    let candidate = prompter.text(text, &current, &rules)?;
                    match rules.check(&candidate) {
                        Ok(()) => break FieldValue::Str(candidate),
                        Err(err @ CommityError::Validation { .. }) => {
                            prompter.invalid(&err);
                            current = candidate;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
            Entry::Choice(ref choice) => {
                let initial = choice.position(values.get_str(name)).unwrap_or(0);
                FieldValue::Str(prompter.choice(choice, initial)?)
            }
            Entry::Boolean(ref boolean) => {
                FieldValue::Bool(prompter.confirm(boolean, values.get_bool(name))?)
            }
        };

        debug!("Field '{name}' answered");
        values.set(name, answer);
    }

    Ok(values)
}

/// Accept every merged value without prompting
///
/// Text constraints still apply; with nobody to correct a value a violation
/// is returned as is.
///
/// # Errors
///
/// Returns the first `Validation` or `PatternCompile` error
pub fn accept_all(config: &Configuration, values: FormValues) -> Result<FormValues, CommityError> {
    for entry in &config.entries {
        if let Entry::Text(ref text) = *entry {
            TextRules::new(text)?.check(values.get_str(&text.name))?;
        }
    }
    Ok(values)
}
