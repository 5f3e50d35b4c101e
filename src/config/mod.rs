//! Configuration management module
//!
//! Handles locating the configuration file, YAML parsing with per-entry type
//! dispatch, JSON schema shape checks and semantic validation.

pub mod entry;
pub mod schema;
pub mod validation;
pub mod yaml;

pub use entry::{BooleanEntry, Choice, ChoiceEntry, Entry, FieldValue, TextEntry};

use crate::error::CommityError;
use crate::system::System;
use crate::utils::path::app_data_dir;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names searched for in the repository and its parents
pub const LOCAL_CONFIG_NAMES: [&str; 2] = [".commity.yaml", ".commity.yml"];

/// File name of the per-user fallback configuration
pub const GLOBAL_CONFIG_NAME: &str = "commity.yaml";

/// Form definition and commit message template
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Configuration {
    /// Fields in prompt order
    pub entries: Vec<Entry>,

    /// Commit message template
    pub template: String,

    /// Show a summary step before the first field
    pub overview: bool,
}

impl Configuration {
    /// Create a configuration from already-built entries
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(entries: Vec<Entry>, template: S, overview: bool) -> Self {
        Self {
            entries,
            template: template.into(),
            overview,
        }
    }

    /// Load and validate configuration from file
    pub fn load_from_file(system: &dyn System, path: &Path) -> Result<Self> {
        let config = yaml::load_config(system, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self, CommityError> {
        let config = yaml::parse_configuration(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants required before collecting values
    pub fn validate(&self) -> Result<(), CommityError> {
        validation::validate_config(self)
    }

    /// Find an entry by name
    #[must_use]
    #[inline]
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }
}

/// Locate the configuration file for a repository
///
/// Walks upward from `start` looking for `.commity.yaml` (or `.commity.yml`),
/// then falls back to `commity.yaml` in the application data directory.
///
/// # Errors
///
/// Returns a `ConfigNotFound` error if neither location has a file
pub fn find_config_file(system: &dyn System, start: &Path) -> Result<PathBuf> {
    let mut searched = Vec::new();

    for dir in start.ancestors() {
        for name in LOCAL_CONFIG_NAMES {
            let candidate = dir.join(name);
            if system.is_file(&candidate)? {
                debug!("Using repository configuration {}", candidate.display());
                return Ok(candidate);
            }
        }
    }
    searched.push(start.join(LOCAL_CONFIG_NAMES[0]));

    let global = app_data_dir(system)?.join(GLOBAL_CONFIG_NAME);
    if system.is_file(&global)? {
        debug!("Using global configuration {}", global.display());
        return Ok(global);
    }
    searched.push(global);

    Err(CommityError::config_not_found(format!(
        "no config file found in {} or {}",
        searched[0].display(),
        searched[1].display()
    ))
    .into())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn test_prefers_nearest_repository_config() {
        let system = MockSystem::new()
            .with_env("COMMITY_DATA_DIR", "/data/commity")
            .unwrap()
            .with_file("/work/.commity.yaml", b"outer")
            .unwrap()
            .with_file("/work/repo/.commity.yml", b"inner")
            .unwrap()
            .with_file("/data/commity/commity.yaml", b"global")
            .unwrap();

        let found = find_config_file(&system, Path::new("/work/repo/src")).unwrap();
        assert_eq!(found, PathBuf::from("/work/repo/.commity.yml"));
    }

    #[test]
    fn test_falls_back_to_global_config() {
        let system = MockSystem::new()
            .with_env("COMMITY_DATA_DIR", "/data/commity")
            .unwrap()
            .with_dir("/work/repo")
            .unwrap()
            .with_file("/data/commity/commity.yaml", b"global")
            .unwrap();

        let found = find_config_file(&system, Path::new("/work/repo")).unwrap();
        assert_eq!(found, PathBuf::from("/data/commity/commity.yaml"));
    }

    #[test]
    fn test_missing_everywhere_is_config_not_found() {
        let system = MockSystem::new()
            .with_env("COMMITY_DATA_DIR", "/data/commity")
            .unwrap()
            .with_dir("/work/repo")
            .unwrap();

        let err = find_config_file(&system, Path::new("/work/repo")).unwrap_err();
        let err = err.downcast_ref::<CommityError>().unwrap();
        assert!(matches!(err, CommityError::ConfigNotFound { .. }));
        assert!(err.to_string().contains("/data/commity/commity.yaml"));
    }
}
