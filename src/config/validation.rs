//! Configuration validation logic

use crate::config::Configuration;
use crate::config::entry::{ChoiceEntry, Entry, TextEntry};
use crate::error::CommityError;
use regex::Regex;
use std::collections::HashSet;

/// Validate a complete configuration before any prompt is shown
///
/// # Errors
///
/// Returns an error if:
/// - The configuration has no entries or an empty template (`InvalidConfiguration`)
/// - An entry name is empty or used twice (`InvalidConfiguration`)
/// - A choice entry has no options or an unknown default (`InvalidConfiguration`)
/// - A text entry has inconsistent length bounds (`InvalidConfiguration`)
/// - A text entry pattern does not compile (`PatternCompile`)
#[inline]
pub fn validate_config(config: &Configuration) -> Result<(), CommityError> {
    if config.entries.is_empty() || config.template.is_empty() {
        return Err(CommityError::invalid_configuration(
            "no entries or template provided",
        ));
    }

    let mut seen = HashSet::new();
    for (index, entry) in config.entries.iter().enumerate() {
        let context = format!("Entry #{}", index + 1);

        if entry.name().trim().is_empty() {
            return Err(CommityError::invalid_configuration(format!(
                "{context}: name cannot be empty"
            )));
        }
        if !seen.insert(entry.name()) {
            return Err(CommityError::invalid_configuration(format!(
                "{context}: duplicate entry name '{}'",
                entry.name()
            )));
        }

        match *entry {
            Entry::Text(ref text) => validate_text_entry(text, &context)?,
            Entry::Choice(ref choice) => validate_choice_entry(choice, &context)?,
            Entry::Boolean(_) => {}
        }
    }

    Ok(())
}

fn validate_text_entry(entry: &TextEntry, context: &str) -> Result<(), CommityError> {
    if entry.max_length > 0 && entry.max_length < entry.min_length {
        return Err(CommityError::invalid_configuration(format!(
            "{context}: maxLength ({}) is smaller than minLength ({})",
            entry.max_length, entry.min_length
        )));
    }

    compile_pattern(entry)?;
    Ok(())
}

fn validate_choice_entry(entry: &ChoiceEntry, context: &str) -> Result<(), CommityError> {
    if entry.choices.is_empty() {
        return Err(CommityError::invalid_configuration(format!(
            "{context}: choice entry '{}' has no choices",
            entry.name
        )));
    }

    if !entry.default.is_empty() && !entry.contains(&entry.default) {
        return Err(CommityError::invalid_configuration(format!(
            "{context}: default '{}' is not one of the choices of '{}'",
            entry.default, entry.name
        )));
    }

    Ok(())
}

/// Compile a text entry's pattern
///
/// Returns `None` when the entry has no pattern.
///
/// # Errors
///
/// Returns a `PatternCompile` error if the pattern is not a valid regex
#[inline]
pub fn compile_pattern(entry: &TextEntry) -> Result<Option<Regex>, CommityError> {
    if entry.pattern.is_empty() {
        return Ok(None);
    }

    Regex::new(&entry.pattern)
        .map(Some)
        .map_err(|e| CommityError::pattern_compile(&entry.name, e.to_string()))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::config::entry::{BooleanEntry, Choice};

    fn config_with(entries: Vec<Entry>) -> Configuration {
        Configuration::new(entries, "{{ .x }}", false)
    }

    #[test]
    fn test_rejects_empty_entries_and_template() {
        let err = validate_config(&config_with(vec![])).unwrap_err();
        assert!(matches!(err, CommityError::InvalidConfiguration { .. }));

        let config = Configuration::new(vec![BooleanEntry::new("x").into()], "", false);
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, CommityError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let config = config_with(vec![
            TextEntry::new("header").into(),
            BooleanEntry::new("header").into(),
        ]);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate entry name 'header'"));
    }

    #[test]
    fn test_rejects_unknown_choice_default() {
        let mut choice = ChoiceEntry::new("type", vec![Choice::new("feat", "Feature")]);
        choice.default = "chore".to_owned();
        let err = validate_config(&config_with(vec![choice.into()])).unwrap_err();
        assert!(err.to_string().contains("'chore'"));
    }

    #[test]
    fn test_broken_pattern_is_pattern_compile_error() {
        let entry = TextEntry::new("ticket").with_pattern("([A-Z]+", "");
        let err = validate_config(&config_with(vec![entry.into()])).unwrap_err();
        assert!(matches!(err, CommityError::PatternCompile { ref field, .. } if field == "ticket"));
    }

    #[test]
    fn test_inverted_length_bounds() {
        let entry = TextEntry::new("header").with_length(20, 10);
        assert!(validate_config(&config_with(vec![entry.into()])).is_err());

        let unbounded = TextEntry::new("header").with_length(20, 0);
        validate_config(&config_with(vec![unbounded.into()])).unwrap();
    }
}
