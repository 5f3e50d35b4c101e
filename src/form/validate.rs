//! Text field constraints

use crate::config::TextEntry;
use crate::config::validation::compile_pattern;
use crate::error::CommityError;
use regex::Regex;

/// Compiled constraints of a text entry
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TextRules<'cfg> {
    entry: &'cfg TextEntry,
    pattern: Option<Regex>,
}

impl<'cfg> TextRules<'cfg> {
    /// Compile the rules of `entry`
    ///
    /// # Errors
    ///
    /// Returns a `PatternCompile` error if the entry's pattern is not a valid
    /// regex; this is a broken configuration, not bad input
    #[inline]
    pub fn new(entry: &'cfg TextEntry) -> Result<Self, CommityError> {
        Ok(Self {
            entry,
            pattern: compile_pattern(entry)?,
        })
    }

    /// Check a candidate value
    ///
    /// Lengths count characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error describing the first violated constraint
    pub fn check(&self, value: &str) -> Result<(), CommityError> {
        let length = value.chars().count();

        if length < self.entry.min_length {
            return Err(CommityError::validation(
                &self.entry.name,
                format!("must be at least {} characters", self.entry.min_length),
            ));
        }

        if self.entry.max_length > 0 && length > self.entry.max_length {
            return Err(CommityError::validation(
                &self.entry.name,
                format!("must be at most {} characters", self.entry.max_length),
            ));
        }

        if let Some(pattern) = self.pattern.as_ref()
            && !pattern.is_match(value)
        {
            let expected = if self.entry.pattern_hint.is_empty() {
                &self.entry.pattern
            } else {
                &self.entry.pattern_hint
            };
            return Err(CommityError::validation(
                &self.entry.name,
                format!("must match {expected}"),
            ));
        }

        Ok(())
    }
}

/// Validate a text value against its entry's constraints
///
/// # Errors
///
/// Returns `PatternCompile` for a broken pattern or `Validation` for a
/// rejected value
#[inline]
pub fn validate_text(entry: &TextEntry, value: &str) -> Result<(), CommityError> {
    TextRules::new(entry)?.check(value)
}
