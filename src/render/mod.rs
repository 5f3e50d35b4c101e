//! Commit message rendering
//!
//! Binds the collected values by field name and runs the configured template.

pub mod template;

pub use template::{Environment, Template};

use crate::config::Configuration;
use crate::error::CommityError;
use crate::form::FormValues;

/// Name used for the commit template in error messages
pub const TEMPLATE_NAME: &str = "message";

/// Build the template environment: every field name bound to its value
///
/// Fields without a collected value are bound to their default.
#[must_use]
pub fn environment(config: &Configuration, values: &FormValues) -> Environment {
    config
        .entries
        .iter()
        .map(|entry| {
            let value = values
                .get(entry.name())
                .cloned()
                .unwrap_or_else(|| entry.default_value());
            (entry.name().to_owned(), value)
        })
        .collect()
}

/// Render the commit message
///
/// # Errors
///
/// Returns an error if:
/// - The template is empty (`InvalidConfiguration`)
/// - The template has malformed syntax (`TemplateParse`)
/// - Evaluating the template fails (`TemplateExecution`)
pub fn render(config: &Configuration, values: &FormValues) -> Result<String, CommityError> {
    if config.template.is_empty() {
        return Err(CommityError::invalid_configuration("template string is empty"));
    }

    let template = Template::parse(TEMPLATE_NAME, &config.template)?;
    template.execute(&environment(config, values))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::config::{BooleanEntry, FieldValue, TextEntry};

    #[test]
    fn test_empty_template_fails_immediately() {
        let config = Configuration::new(vec![TextEntry::new("a").into()], "", false);
        let err = render(&config, &FormValues::from_defaults(&config)).unwrap_err();
        assert!(matches!(err, CommityError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_unset_values_use_defaults() {
        let mut flag = BooleanEntry::new("flag");
        flag.default = true;
        let config = Configuration::new(vec![flag.into()], "{{ .flag }}", false);
        assert_eq!(render(&config, &FormValues::default()).unwrap(), "true");
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = Configuration::new(
            vec![TextEntry::new("a").into(), TextEntry::new("b").into()],
            " {{ .a }} \n\t{{ .b }}\n",
            false,
        );
        let mut values = FormValues::from_defaults(&config);
        values.set("a", FieldValue::Str("one".to_owned()));
        values.set("b", FieldValue::Str("two".to_owned()));

        let first = render(&config, &values).unwrap();
        let second = render(&config, &values).unwrap();
        assert_eq!(first, " one \n\ttwo\n");
        assert_eq!(first, second);
    }
}
