//! YAML configuration loading and parsing

use crate::config::Configuration;
use crate::config::entry::{
    BOOLEAN_TYPE, BooleanEntry, CHOICE_TYPE, ChoiceEntry, Entry, TEXT_TYPE, TextEntry,
};
use crate::error::CommityError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

/// Top-level document with entries still undecoded
#[derive(Debug, Deserialize)]
struct RawConfiguration {
    #[serde(default)]
    entries: Vec<Value>,
    #[serde(default)]
    template: String,
    #[serde(default)]
    overview: bool,
}

/// First decoding pass of an entry: only the discriminator
#[derive(Debug, Deserialize)]
struct EntryKind {
    #[serde(default, rename = "type")]
    kind: String,
}

/// Load and parse YAML configuration from file
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist or cannot be read
/// - The document is not valid YAML or has the wrong shape
/// - An entry has an unknown `type`
pub fn load_config(system: &dyn System, path: &Path) -> Result<Configuration> {
    if !system.exists(path)? {
        return Err(CommityError::config_not_found(format!(
            "Configuration file not found: {}",
            path.display()
        ))
        .into());
    }

    let content = system
        .read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    debug!("Parsing configuration from {}", path.display());
    parse_configuration(&content)
        .with_context(|| format!("Invalid configuration file: {}", path.display()))
}

/// Parse a configuration document
///
/// Each entry is decoded in two passes: first its `type` discriminator, then
/// the full shape of the matching kind.
///
/// # Errors
///
/// Returns a `ConfigParse` error for malformed YAML, a shape violation or an
/// unknown entry type
pub fn parse_configuration(content: &str) -> Result<Configuration, CommityError> {
    let document: Value = serde_yaml::from_str(content)
        .map_err(|e| CommityError::config_parse(format!("Failed to parse YAML: {e}")))?;

    let json_document = serde_json::to_value(&document).map_err(|e| {
        CommityError::config_parse(format!("Configuration cannot be represented as JSON: {e}"))
    })?;
    crate::config::schema::validate_against_schema(&json_document)?;

    let raw: RawConfiguration = decode(document, "configuration")?;

    let entries = raw
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, node)| parse_entry(node, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Configuration {
        entries,
        template: raw.template,
        overview: raw.overview,
    })
}

/// Decode one entry node, dispatching on its `type`
fn parse_entry(node: Value, index: usize) -> Result<Entry, CommityError> {
    let context = format!("entry #{}", index + 1);
    let EntryKind { kind } = decode(node.clone(), &context)?;

    let entry = match kind.as_str() {
        TEXT_TYPE => Entry::Text(decode::<TextEntry>(node, &context)?),
        CHOICE_TYPE => {
            let mut choice: ChoiceEntry = decode(node, &context)?;
            if choice.show_values {
                choice.apply_show_values();
            }
            Entry::Choice(choice)
        }
        BOOLEAN_TYPE => Entry::Boolean(decode::<BooleanEntry>(node, &context)?),
        _ => {
            return Err(CommityError::config_parse(format!(
                "unknown entry type: {kind}"
            )));
        }
    };

    debug!("Parsed {} entry '{}'", entry.kind(), entry.name());
    Ok(entry)
}

fn decode<T: DeserializeOwned>(node: Value, context: &str) -> Result<T, CommityError> {
    serde_yaml::from_value(node)
        .map_err(|e| CommityError::config_parse(format!("Invalid {context}: {e}")))
}
