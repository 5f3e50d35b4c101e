//! Path helpers for the application data directory

use crate::error::CommityError;
use crate::system::System;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Environment variable overriding the application data directory
pub const DATA_DIR_ENV: &str = "COMMITY_DATA_DIR";

/// Name of the application directory under the user's config directory
pub const APP_DIR_NAME: &str = "commity";

/// Name of the value cache folder inside the application data directory
pub const CACHE_DIR_NAME: &str = "cache";

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading '..' components
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else if !matches!(components.last(), Some(Component::RootDir)) {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Per-user application data directory
///
/// `COMMITY_DATA_DIR` wins; otherwise `<config dir>/commity`.
///
/// # Errors
///
/// Returns a `ConfigNotFound` error if the user's config directory cannot be
/// determined
pub fn app_data_dir(system: &dyn System) -> Result<PathBuf> {
    if let Ok(dir) = system.env_var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            CommityError::config_not_found("unable to determine the data directory").into()
        })
}

/// Directory holding one value cache file per repository
///
/// # Errors
///
/// Returns an error if the application data directory cannot be determined
pub fn cache_dir(system: &dyn System) -> Result<PathBuf> {
    Ok(app_data_dir(system)?.join(CACHE_DIR_NAME))
}
