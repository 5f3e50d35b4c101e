//! JSON Schema validation for the configuration document shape

use crate::error::CommityError;
use jsonschema::{Draft, Validator};
use serde_json::Value;

/// Get the embedded JSON schema for commity configuration
///
/// # Errors
///
/// Returns an error if the embedded schema itself is broken
pub fn get_schema() -> Result<Validator, CommityError> {
    let schema_str = include_str!("../../docs/schema.json");
    let schema: Value = serde_json::from_str(schema_str).map_err(|e| {
        CommityError::config_parse(format!("Failed to parse embedded JSON schema: {e}"))
    })?;

    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&schema)
        .map_err(|e| CommityError::config_parse(format!("Failed to compile JSON schema: {e}")))
}

/// Validate a configuration document against the schema
///
/// The schema only checks shape. Entry `type` values are left to the entry
/// dispatcher so unknown kinds are reported by name.
///
/// # Errors
///
/// Returns a `ConfigParse` error listing every schema violation
pub fn validate_against_schema(document: &Value) -> Result<(), CommityError> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(document)
        .map(|e| format!("  - {e}"))
        .collect();

    if !error_messages.is_empty() {
        return Err(CommityError::config_parse(format!(
            "Configuration does not match the expected shape:\n{}",
            error_messages.join("\n")
        )));
    }

    Ok(())
}
