//! Live field values and overlay merging

use crate::config::{Configuration, Entry, FieldValue};
use crate::store::StoredValues;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Values supplied explicitly by the caller, by field name
pub type Overrides = HashMap<String, String>;

/// Coerce an overlay string into a value for `entry`
///
/// Returns `None` when the overlay must be ignored:
/// - text: the overlay is empty
/// - choice: the overlay is not one of the option values
///
/// Booleans never ignore an overlay: case-insensitive `true` or `1` is `true`,
/// anything else is `false`.
#[must_use]
pub fn coerce(entry: &Entry, raw: &str) -> Option<FieldValue> {
    match *entry {
        Entry::Text(_) => (!raw.is_empty()).then(|| FieldValue::Str(raw.to_owned())),
        Entry::Choice(ref choice) => choice
            .contains(raw)
            .then(|| FieldValue::Str(raw.to_owned())),
        Entry::Boolean(_) => Some(FieldValue::Bool(
            raw.eq_ignore_ascii_case("true") || raw == "1",
        )),
    }
}

/// Values of every field of one run, keyed by field name
///
/// Kept apart from the [`Configuration`] so the parsed entries stay immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, FieldValue>,
}

impl FormValues {
    /// Every field at its default
    #[must_use]
    pub fn from_defaults(config: &Configuration) -> Self {
        let values = config
            .entries
            .iter()
            .map(|entry| (entry.name().to_owned(), entry.default_value()))
            .collect();
        Self { values }
    }

    /// Merge the overlays over the defaults
    ///
    /// Precedence per field is explicit override, then stored value (only for
    /// `store` fields), then default. An overlay that does not coerce is
    /// skipped and the next source applies.
    #[must_use]
    pub fn resolve(config: &Configuration, overrides: &Overrides, stored: &StoredValues) -> Self {
        let mut form = Self::from_defaults(config);

        for entry in &config.entries {
            let name = entry.name();

            if let Some(value) = overrides.get(name).and_then(|raw| coerce(entry, raw)) {
                debug!("Field '{name}' set from override");
                form.set(name, value);
            } else if let Some(value) = entry
                .store()
                .then(|| stored.get(name))
                .flatten()
                .and_then(|raw| coerce(entry, raw))
            {
                debug!("Field '{name}' restored from cache");
                form.set(name, value);
            }
        }

        for name in overrides.keys() {
            if config.entry(name).is_none() {
                warn!("Ignoring value for unknown field '{name}'");
            }
        }

        form
    }

    /// Current value of a field
    #[must_use]
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Current value of a text or choice field, empty when unset
    #[must_use]
    #[inline]
    pub fn get_str(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_str).unwrap_or_default()
    }

    /// Current value of a boolean field, `false` when unset
    #[must_use]
    #[inline]
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name)
            .and_then(FieldValue::as_bool)
            .unwrap_or_default()
    }

    /// Replace a field's value
    #[inline]
    pub fn set<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    /// Iterate over all values in no particular order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Values to remember for the next run: `store` fields only
    #[must_use]
    pub fn stored_values(&self, config: &Configuration) -> StoredValues {
        config
            .entries
            .iter()
            .filter(|entry| entry.store())
            .filter_map(|entry| {
                self.get(entry.name())
                    .map(|value| (entry.name().to_owned(), value.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BooleanEntry, Choice, ChoiceEntry, TextEntry};

    fn config() -> Configuration {
        let mut kind = ChoiceEntry::new(
            "type",
            vec![
                Choice::new("feat", "Feature"),
                Choice::new("fix", "Fix"),
                Choice::new("docs", "Docs"),
            ],
        );
        kind.default = "feat".to_owned();
        kind.store = true;

        let mut scope = TextEntry::new("scope");
        scope.store = true;
        scope.default = "core".to_owned();

        let header = TextEntry::new("header").with_length(10, 50);

        let mut breaking = BooleanEntry::new("breaking_change");
        breaking.store = true;

        Configuration::new(
            vec![kind.into(), scope.into(), header.into(), breaking.into()],
            "{{ .type }}",
            false,
        )
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let values = FormValues::from_defaults(&config());
        assert_eq!(values.get_str("type"), "feat");
        assert_eq!(values.get_str("scope"), "core");
        assert_eq!(values.get_str("header"), "");
        assert!(!values.get_bool("breaking_change"));
    }

    #[test]
    fn test_choice_coercion() {
        let config = config();
        let values = FormValues::resolve(&config, &map(&[("type", "docs")]), &StoredValues::new());
        assert_eq!(values.get_str("type"), "docs");

        let values = FormValues::resolve(&config, &map(&[("type", "bogus")]), &StoredValues::new());
        assert_eq!(values.get_str("type"), "feat");
    }

    #[test]
    fn test_boolean_coercion_is_lenient() {
        let config = config();
        let entry = config.entry("breaking_change").unwrap();
        assert_eq!(coerce(entry, "TRUE"), Some(FieldValue::Bool(true)));
        assert_eq!(coerce(entry, "1"), Some(FieldValue::Bool(true)));
        assert_eq!(coerce(entry, "no"), Some(FieldValue::Bool(false)));
        // Unrecognized strings resolve to false rather than erroring
        assert_eq!(coerce(entry, "yes"), Some(FieldValue::Bool(false)));
    }

    #[test]
    fn test_text_overlay_skips_validation_and_empty_strings() {
        let config = config();
        let values = FormValues::resolve(&config, &map(&[("header", "short")]), &StoredValues::new());
        assert_eq!(values.get_str("header"), "short");

        let values = FormValues::resolve(&config, &map(&[("scope", "")]), &StoredValues::new());
        assert_eq!(values.get_str("scope"), "core");
    }

    #[test]
    fn test_precedence_override_then_stored_then_default() {
        let config = config();
        let stored = map(&[("type", "fix"), ("scope", "parser"), ("breaking_change", "true")])
            .into_iter()
            .collect::<StoredValues>();

        let values = FormValues::resolve(&config, &Overrides::new(), &stored);
        assert_eq!(values.get_str("type"), "fix");
        assert_eq!(values.get_str("scope"), "parser");
        assert!(values.get_bool("breaking_change"));

        let overrides = map(&[("type", "docs"), ("scope", "cli"), ("breaking_change", "false")]);
        let values = FormValues::resolve(&config, &overrides, &stored);
        assert_eq!(values.get_str("type"), "docs");
        assert_eq!(values.get_str("scope"), "cli");
        assert!(!values.get_bool("breaking_change"));
    }

    #[test]
    fn test_stored_values_ignored_for_non_store_fields() {
        let config = config();
        let stored = map(&[("header", "remembered header")])
            .into_iter()
            .collect::<StoredValues>();
        let values = FormValues::resolve(&config, &Overrides::new(), &stored);
        assert_eq!(values.get_str("header"), "");
    }

    #[test]
    fn test_invalid_override_falls_back_to_stored() {
        let config = config();
        let stored = map(&[("type", "fix")]).into_iter().collect::<StoredValues>();
        let values = FormValues::resolve(&config, &map(&[("type", "bogus")]), &stored);
        assert_eq!(values.get_str("type"), "fix");
    }

    #[test]
    fn test_stored_values_only_include_store_fields() {
        let config = config();
        let mut values = FormValues::from_defaults(&config);
        values.set("header", FieldValue::Str("a long enough header".to_owned()));
        values.set("breaking_change", FieldValue::Bool(true));

        let stored = values.stored_values(&config);
        let keys: Vec<&str> = stored.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["breaking_change", "scope", "type"]);
        assert_eq!(stored.get("breaking_change").map(String::as_str), Some("true"));
    }
}
