//! Commit operation coordination

use crate::cli::Args;
use crate::config::{Configuration, find_config_file};
use crate::error::CommityError;
use crate::form::{FormValues, Overrides, Overview, Prompter, accept_all, collect};
use crate::git::{Repository, find_repository};
use crate::render::render;
use crate::store::{StoredValues, ValueStore, repository_key};
use crate::system::System;
use anyhow::{Context as _, Result};
use git2::Oid;
use tracing::{debug, info, warn};

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommitOutcome {
    /// The commit was created
    Committed { oid: Oid, message: String },
    /// Dry run: the message was rendered but nothing was written
    Preview { message: String },
}

impl CommitOutcome {
    /// The rendered commit message
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        match *self {
            Self::Committed { ref message, .. } | Self::Preview { ref message } => message,
        }
    }
}

/// Coordinates one form run and the commit that follows it
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "CommitOperation")]
pub struct CommitOperation<'src> {
    config: Configuration,
    repository: Repository,
    overrides: Overrides,
    accept_all: bool,
    dry_run: bool,
    system: &'src dyn System,
}

impl<'src> CommitOperation<'src> {
    /// Create a commit operation from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No repository contains the target directory
    /// - No configuration file is found, or it is invalid
    /// - A `--set` argument is malformed
    pub fn new(args: &Args, system: &'src dyn System) -> Result<Self> {
        let start = match args.directory.as_ref() {
            Some(dir) => system
                .canonicalize(dir)
                .with_context(|| format!("Cannot access directory: {}", dir.display()))?,
            None => system
                .current_dir()
                .map_err(|e| CommityError::repository(format!("Cannot get current directory: {e}")))?,
        };

        let repo_path = find_repository(system, &start)?;
        let repository = Repository::open(&repo_path)?;

        let config_path = match args.config.as_ref() {
            Some(path) => path.clone(),
            None => find_config_file(system, &start)?,
        };
        let config = Configuration::load_from_file(system, &config_path)?;

        Ok(Self {
            config,
            repository,
            overrides: args.parse_overrides()?,
            accept_all: args.yes,
            dry_run: args.dry_run,
            system,
        })
    }

    /// Create a commit operation from already-resolved parts
    #[must_use]
    #[inline]
    pub fn from_parts(
        config: Configuration,
        repository: Repository,
        overrides: Overrides,
        system: &'src dyn System,
    ) -> Self {
        Self {
            config,
            repository,
            overrides,
            accept_all: false,
            dry_run: false,
            system,
        }
    }

    /// Accept every merged value without prompting (builder pattern)
    #[must_use]
    #[inline]
    pub const fn with_accept_all(mut self, accept_all: bool) -> Self {
        self.accept_all = accept_all;
        self
    }

    /// Render only, without committing or remembering values (builder pattern)
    #[must_use]
    #[inline]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The loaded configuration
    #[must_use]
    #[inline]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Execute the operation
    ///
    /// Values of `store` fields are remembered only after the commit succeeds;
    /// failing to remember them is logged and does not fail the run.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is staged (unless this is a dry run)
    /// - The user cancels (`UserAborted`)
    /// - Rendering fails
    /// - The commit cannot be created
    pub fn execute(&self, prompter: &mut dyn Prompter) -> Result<CommitOutcome> {
        let staged_changes = self.repository.staged_change_count()?;
        if staged_changes == 0 && !self.dry_run {
            return Err(CommityError::repository(format!(
                "Nothing to commit in {}",
                self.repository.path().display()
            ))
            .into());
        }
        debug!("{staged_changes} staged change(s)");

        let key = repository_key(self.system, self.repository.path())?;
        let store = match ValueStore::open(self.system) {
            Ok(store) => Some(store),
            Err(err) => {
                warn!("Remembered values are unavailable: {err}");
                None
            }
        };
        let stored = store
            .as_ref()
            .map(|store| store.load(&key))
            .unwrap_or_default();

        let values = FormValues::resolve(&self.config, &self.overrides, &stored);
        let values = if self.accept_all {
            accept_all(&self.config, values)?
        } else {
            let overview = Overview::new(self.repository.path().to_path_buf(), staged_changes);
            collect(&self.config, values, &overview, prompter)?
        };

        let message = render(&self.config, &values)?;

        if self.dry_run {
            info!("Dry run: skipping commit");
            return Ok(CommitOutcome::Preview { message });
        }

        let author = self.repository.identity()?;
        let oid = self.repository.commit(&message, &author)?;
        info!("Committed {oid}");

        if let Some(store) = store.as_ref() {
            remember(store, &key, &values.stored_values(&self.config));
        }

        Ok(CommitOutcome::Committed { oid, message })
    }
}

fn remember(store: &ValueStore<'_>, key: &str, values: &StoredValues) {
    if let Err(err) = store.save(key, values) {
        warn!("{err}");
    }
}
