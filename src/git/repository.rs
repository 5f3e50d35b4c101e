//! Git repository handling

use crate::error::CommityError;
use crate::system::System;
use anyhow::Result;
use git2::{ErrorCode, Oid, Signature, Status, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Author recorded on the commit
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    #[must_use]
    #[inline]
    pub fn new<N: Into<String>, E: Into<String>>(name: N, email: E) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Find the nearest repository, walking upward from `start`
///
/// A directory qualifies when it contains `.git` or `git2` can open it.
///
/// # Errors
///
/// Returns a `Repository` error if no ancestor is a repository
pub fn find_repository(system: &dyn System, start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        if system.exists(&dir.join(".git"))? {
            debug!("Found repository at {}", dir.display());
            return Ok(dir.to_path_buf());
        }
        if git2::Repository::open(dir).is_ok() {
            debug!("Opened repository at {}", dir.display());
            return Ok(dir.to_path_buf());
        }
    }

    Err(CommityError::repository(format!(
        "no Git repository found from {}",
        start.display()
    ))
    .into())
}

/// An opened Git repository
#[non_exhaustive]
pub struct Repository {
    path: PathBuf,
    inner: git2::Repository,
}

impl Repository {
    /// Open the repository at `path`
    ///
    /// # Errors
    ///
    /// Returns a `Repository` error if `path` is not a repository
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::open(path).map_err(|e| {
            CommityError::repository(format!(
                "Failed to open Git repository {}: {e}",
                path.display()
            ))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Path the repository was opened from
    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries with staged changes
    ///
    /// # Errors
    ///
    /// Returns a `Repository` error if the status cannot be read
    pub fn staged_change_count(&self) -> Result<usize> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self
            .inner
            .statuses(Some(&mut options))
            .map_err(|e| CommityError::repository(format!("Failed to get Git status: {e}")))?;

        let staged = Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status().intersects(staged))
            .count())
    }

    /// Author configured through `user.name` and `user.email`
    ///
    /// # Errors
    ///
    /// Returns a `Repository` error if either setting is missing
    pub fn identity(&self) -> Result<Identity> {
        let config = self
            .inner
            .config()
            .map_err(|e| CommityError::repository(format!("Failed to read Git config: {e}")))?;

        let read = |key: &str| {
            config.get_string(key).map_err(|e| {
                CommityError::repository(format!("{key} is not configured: {e}"))
            })
        };

        Ok(Identity::new(read("user.name")?, read("user.email")?))
    }

    /// Commit the index on the current branch
    ///
    /// An unborn branch gets a root commit.
    ///
    /// # Errors
    ///
    /// Returns a `Repository` error if the tree or the commit cannot be written
    pub fn commit(&self, message: &str, author: &Identity) -> Result<Oid> {
        let repo_error =
            |e: git2::Error| CommityError::repository(format!("Failed to create commit: {e}"));

        let signature = Signature::now(&author.name, &author.email).map_err(repo_error)?;
        let mut index = self.inner.index().map_err(repo_error)?;
        // Pick up changes staged since the index was first loaded
        index.read(false).map_err(repo_error)?;
        let tree_id = index.write_tree().map_err(repo_error)?;
        let tree = self.inner.find_tree(tree_id).map_err(repo_error)?;

        let parent = match self.inner.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(repo_error)?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(repo_error(e).into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .inner
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(repo_error)?;

        debug!("Created commit {oid}");
        Ok(oid)
    }
}
