//! Form field definitions
//!
//! An entry describes one prompt of the commit form. Entries are immutable once
//! parsed; the values collected for them live in [`crate::form::FormValues`].

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator literal for text entries
pub const TEXT_TYPE: &str = "Text";
/// Discriminator literal for choice entries
pub const CHOICE_TYPE: &str = "Choice";
/// Discriminator literal for boolean entries
pub const BOOLEAN_TYPE: &str = "Boolean";

/// Accept any YAML scalar for a string field: `value: 1` reads as `"1"`, a
/// null as the empty string
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct ScalarVisitor;

    impl Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_owned())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

fn label_or_name<'a>(label: &'a str, name: &'a str) -> &'a str {
    if label.is_empty() { name } else { label }
}

/// Value held by a field, either collected or defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldValue {
    /// Text and choice fields
    Str(String),
    /// Boolean fields
    Bool(bool),
}

impl FieldValue {
    /// Template truthiness: empty strings and `false` are falsy
    #[must_use]
    #[inline]
    pub const fn is_truthy(&self) -> bool {
        match *self {
            Self::Str(ref s) => !s.is_empty(),
            Self::Bool(b) => b,
        }
    }

    /// Borrow the string payload, if any
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Self::Str(ref s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    /// Get the boolean payload, if any
    #[must_use]
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Str(ref s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Free text entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct TextEntry {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,
    /// Minimum number of characters
    #[serde(default)]
    pub min_length: usize,
    /// Maximum number of characters, 0 means unbounded
    #[serde(default)]
    pub max_length: usize,
    /// Collect the value in an editor instead of a single line
    #[serde(default)]
    pub multi_line: bool,
    /// Regular expression the final value must match
    #[serde(default, deserialize_with = "scalar_string")]
    pub pattern: String,
    /// Shown instead of the raw pattern when the value does not match
    #[serde(default, deserialize_with = "scalar_string")]
    pub pattern_hint: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub default: String,
    #[serde(default)]
    pub store: bool,
}

impl TextEntry {
    /// Prompt title, falling back to the name when no label is set
    #[must_use]
    #[inline]
    pub fn title(&self) -> &str {
        label_or_name(&self.label, &self.name)
    }

    /// Create a text entry with the given name and no constraints
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the length bounds (builder pattern)
    #[must_use]
    #[inline]
    pub const fn with_length(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Set the pattern and its hint (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_pattern<P: Into<String>, H: Into<String>>(mut self, pattern: P, hint: H) -> Self {
        self.pattern = pattern.into();
        self.pattern_hint = hint.into();
        self
    }
}

/// One selectable option of a choice entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Choice {
    /// Value bound into the template
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
    /// Text shown in the selection list
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,
}

impl Choice {
    #[must_use]
    #[inline]
    pub fn new<V: Into<String>, L: Into<String>>(value: V, label: L) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Single selection from a fixed list of options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ChoiceEntry {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub default: String,
    #[serde(default)]
    pub store: bool,
    /// Prefix every label with its raw value
    #[serde(default)]
    pub show_values: bool,
}

impl ChoiceEntry {
    /// Prompt title, falling back to the name when no label is set
    #[must_use]
    #[inline]
    pub fn title(&self) -> &str {
        label_or_name(&self.label, &self.name)
    }

    /// Create a choice entry with the given options
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(name: S, choices: Vec<Choice>) -> Self {
        Self {
            name: name.into(),
            choices,
            ..Self::default()
        }
    }

    /// Whether `value` is one of the declared option values
    #[must_use]
    #[inline]
    pub fn contains(&self, value: &str) -> bool {
        self.choices.iter().any(|choice| choice.value == value)
    }

    /// Position of `value` in the option list
    #[must_use]
    #[inline]
    pub fn position(&self, value: &str) -> Option<usize> {
        self.choices.iter().position(|choice| choice.value == value)
    }

    /// Rewrite labels as `<value><padding> <label>` with the value column
    /// aligned to the widest value
    pub fn apply_show_values(&mut self) {
        let width = self
            .choices
            .iter()
            .map(|choice| choice.value.chars().count())
            .max()
            .unwrap_or(0);

        for choice in &mut self.choices {
            choice.label = format!("{:<width$} {}", choice.value, choice.label);
        }
    }
}

/// Yes/no confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct BooleanEntry {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub store: bool,
}

impl BooleanEntry {
    /// Prompt title, falling back to the name when no label is set
    #[must_use]
    #[inline]
    pub fn title(&self) -> &str {
        label_or_name(&self.label, &self.name)
    }

    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A form field, one of the three supported kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Entry {
    Text(TextEntry),
    Choice(ChoiceEntry),
    Boolean(BooleanEntry),
}

impl Entry {
    /// Template binding key and cache key
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        match *self {
            Self::Text(ref e) => &e.name,
            Self::Choice(ref e) => &e.name,
            Self::Boolean(ref e) => &e.name,
        }
    }

    /// Prompt title, falling back to the name when no label is set
    #[must_use]
    #[inline]
    pub fn label(&self) -> &str {
        match *self {
            Self::Text(ref e) => e.title(),
            Self::Choice(ref e) => e.title(),
            Self::Boolean(ref e) => e.title(),
        }
    }

    #[must_use]
    #[inline]
    pub fn description(&self) -> &str {
        match *self {
            Self::Text(ref e) => &e.description,
            Self::Choice(ref e) => &e.description,
            Self::Boolean(ref e) => &e.description,
        }
    }

    /// Whether the collected value is remembered for the next run
    #[must_use]
    #[inline]
    pub const fn store(&self) -> bool {
        match *self {
            Self::Text(ref e) => e.store,
            Self::Choice(ref e) => e.store,
            Self::Boolean(ref e) => e.store,
        }
    }

    /// Discriminator literal used in the configuration document
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> &'static str {
        match *self {
            Self::Text(_) => TEXT_TYPE,
            Self::Choice(_) => CHOICE_TYPE,
            Self::Boolean(_) => BOOLEAN_TYPE,
        }
    }

    /// Value the field starts with before any overlay is applied
    ///
    /// A choice without a default starts on its first option.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> FieldValue {
        match *self {
            Self::Text(ref e) => FieldValue::Str(e.default.clone()),
            Self::Choice(ref e) => {
                if e.default.is_empty() {
                    FieldValue::Str(
                        e.choices
                            .first()
                            .map(|choice| choice.value.clone())
                            .unwrap_or_default(),
                    )
                } else {
                    FieldValue::Str(e.default.clone())
                }
            }
            Self::Boolean(ref e) => FieldValue::Bool(e.default),
        }
    }
}

impl From<TextEntry> for Entry {
    fn from(entry: TextEntry) -> Self {
        Self::Text(entry)
    }
}

impl From<ChoiceEntry> for Entry {
    fn from(entry: ChoiceEntry) -> Self {
        Self::Choice(entry)
    }
}

impl From<BooleanEntry> for Entry {
    fn from(entry: BooleanEntry) -> Self {
        Self::Boolean(entry)
    }
}
