//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for commity operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CommityError {
    /// No repository-local or global configuration file exists
    #[error("Configuration not found: {message}")]
    ConfigNotFound { message: String },

    /// The configuration document could not be decoded
    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    /// The configuration decoded but cannot drive a form
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A field value was rejected; the user can correct it
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A field pattern is not a valid regular expression
    #[error("Invalid pattern for field '{field}': {message}")]
    PatternCompile { field: String, message: String },

    /// The commit template has malformed syntax
    #[error("Failed to parse template: {message}")]
    TemplateParse { message: String },

    /// The commit template failed while being evaluated
    #[error("Failed to execute template: {message}")]
    TemplateExecution { message: String },

    /// The value cache could not be read
    #[error("Failed to read stored values: {message}")]
    PersistenceRead { message: String },

    /// The value cache could not be written
    #[error("Failed to store values: {message}")]
    PersistenceWrite { message: String },

    /// Repository lookup, inspection or commit failed
    #[error("Repository error: {message}")]
    Repository { message: String },

    /// The terminal prompt itself failed
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// The user canceled the form
    #[error("Commit canceled")]
    UserAborted,
}

impl CommityError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::InvalidConfiguration { .. }
            | Self::Validation { .. }
            | Self::PatternCompile { .. }
            | Self::PersistenceRead { .. }
            | Self::PersistenceWrite { .. }
            | Self::Prompt { .. } => 1,
            Self::TemplateParse { .. } | Self::TemplateExecution { .. } => 2,
            Self::Repository { .. } => 3,
            Self::UserAborted => 130,
        }
    }

    /// Whether this error is a user cancellation rather than a failure
    #[must_use]
    #[inline]
    pub const fn is_abort(&self) -> bool {
        matches!(*self, Self::UserAborted)
    }

    /// Create a config-not-found error
    #[inline]
    pub fn config_not_found<S: Into<String>>(message: S) -> Self {
        Self::ConfigNotFound {
            message: message.into(),
        }
    }

    /// Create a config parse error
    #[inline]
    pub fn config_parse<S: Into<String>>(message: S) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    #[inline]
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a field validation error
    #[inline]
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a pattern compile error
    #[inline]
    pub fn pattern_compile<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::PatternCompile {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a template parse error
    #[inline]
    pub fn template_parse<S: Into<String>>(message: S) -> Self {
        Self::TemplateParse {
            message: message.into(),
        }
    }

    /// Create a template execution error
    #[inline]
    pub fn template_execution<S: Into<String>>(message: S) -> Self {
        Self::TemplateExecution {
            message: message.into(),
        }
    }

    /// Create a persistence read error
    #[inline]
    pub fn persistence_read<S: Into<String>>(message: S) -> Self {
        Self::PersistenceRead {
            message: message.into(),
        }
    }

    /// Create a persistence write error
    #[inline]
    pub fn persistence_write<S: Into<String>>(message: S) -> Self {
        Self::PersistenceWrite {
            message: message.into(),
        }
    }

    /// Create a prompt error
    #[inline]
    pub fn prompt<S: Into<String>>(message: S) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    /// Create a repository error
    #[inline]
    pub fn repository<S: Into<String>>(message: S) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }
}
