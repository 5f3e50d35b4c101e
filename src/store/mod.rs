//! Value cache
//!
//! Remembers the values of `store` fields between runs. There is one JSON file
//! per repository under `<data dir>/cache`, named after a hash of the
//! repository's absolute path. The cache is best effort: read failures fall
//! back to an empty map and write failures are reported to the caller as
//! non-fatal.

use crate::error::CommityError;
use crate::system::System;
use crate::utils::path::{cache_dir, normalize_path};
use anyhow::Result;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

/// Field name to serialized value
pub type StoredValues = BTreeMap<String, String>;

/// Stable identifier of a repository, derived from its absolute path
///
/// # Errors
///
/// Returns an error if a relative path cannot be made absolute
pub fn repository_key(system: &dyn System, repo_path: &Path) -> Result<String> {
    let absolute = match system.canonicalize(repo_path) {
        Ok(path) => path,
        Err(_) if repo_path.is_absolute() => repo_path.to_path_buf(),
        Err(_) => system.current_dir()?.join(repo_path),
    };
    let normalized = normalize_path(&absolute);
    let hash = xxh3_64(normalized.to_string_lossy().as_bytes());
    Ok(format!("{hash:016x}"))
}

/// Per-repository store of previously entered values
#[non_exhaustive]
pub struct ValueStore<'src> {
    system: &'src dyn System,
    dir: PathBuf,
}

impl<'src> ValueStore<'src> {
    /// Create a store rooted at `dir`
    #[must_use]
    #[inline]
    pub fn new(system: &'src dyn System, dir: PathBuf) -> Self {
        Self { system, dir }
    }

    /// Create a store in the default cache directory
    ///
    /// # Errors
    ///
    /// Returns an error if the application data directory cannot be determined
    #[inline]
    pub fn open(system: &'src dyn System) -> Result<Self> {
        Ok(Self::new(system, cache_dir(system)?))
    }

    /// Cache file for a repository key
    #[must_use]
    #[inline]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read the stored values for a repository
    ///
    /// A missing file is an empty map.
    ///
    /// # Errors
    ///
    /// Returns a `PersistenceRead` error if the file exists but cannot be read
    /// or decoded
    pub fn try_load(&self, key: &str) -> Result<StoredValues, CommityError> {
        let path = self.path_for(key);

        let content = match self.system.read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored values at {}", path.display());
                return Ok(StoredValues::new());
            }
            Err(e) => {
                return Err(CommityError::persistence_read(format!(
                    "{}: {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| CommityError::persistence_read(format!("{}: {e}", path.display())))
    }

    /// Read the stored values, treating any failure as an empty map
    #[must_use]
    pub fn load(&self, key: &str) -> StoredValues {
        self.try_load(key).unwrap_or_else(|err| {
            warn!("{err}");
            StoredValues::new()
        })
    }

    /// Replace the stored values for a repository
    ///
    /// # Errors
    ///
    /// Returns a `PersistenceWrite` error if the directory cannot be created
    /// or the file cannot be written
    pub fn save(&self, key: &str, values: &StoredValues) -> Result<(), CommityError> {
        let path = self.path_for(key);

        self.system.create_dir_all(&self.dir).map_err(|e| {
            CommityError::persistence_write(format!("{}: {e}", self.dir.display()))
        })?;

        let content = serde_json::to_string_pretty(values)
            .map_err(|e| CommityError::persistence_write(e.to_string()))?;

        self.system
            .write_atomic(&path, content.as_bytes())
            .map_err(|e| CommityError::persistence_write(format!("{}: {e}", path.display())))?;

        debug!("Stored {} value(s) at {}", values.len(), path.display());
        Ok(())
    }
}
