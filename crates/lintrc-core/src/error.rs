//! Error types for policy loading and compilation

use std::path::PathBuf;
use thiserror::Error;

use crate::source::{ConfigLocation, DocumentSource};

/// Main error type for lintrc operations
#[derive(Debug, Error)]
pub enum LintrcError {
    /// The `extends` graph loops back onto a document that is still being resolved
    #[error("Configuration cycle detected: {}", format_chain(.chain))]
    ConfigurationCycle { chain: Vec<String> },

    /// A rule entry has no usable severity or the wrong shape
    #[error("Invalid setting for rule '{rule}' in {source_doc} ({location}): {value}")]
    InvalidRuleSetting {
        rule: String,
        value: serde_json::Value,
        source_doc: DocumentSource,
        location: ConfigLocation,
    },

    /// A rule name that the registry does not know (strict mode only)
    #[error(
        "Unknown rule '{rule}' in {source_doc} ({location}){}",
        format_suggestion(.suggestion)
    )]
    UnknownRule {
        rule: String,
        source_doc: DocumentSource,
        location: ConfigLocation,
        suggestion: Option<String>,
    },

    /// An environment name with no globals bundle (strict mode only)
    #[error("Unknown environment '{env}' in {source_doc} ({location})")]
    UnknownEnvironment {
        env: String,
        source_doc: DocumentSource,
        location: ConfigLocation,
    },

    /// A file selector that cannot be compiled
    #[error("Invalid glob pattern '{pattern}' in {source_doc} ({location}): {reason}")]
    InvalidGlobPattern {
        pattern: String,
        source_doc: DocumentSource,
        location: ConfigLocation,
        reason: String,
    },

    /// An `extends` reference that no resolver could provide
    #[error("Cannot resolve extends '{reference}' from {source_doc}: {reason}")]
    UnresolvedExtends {
        reference: String,
        source_doc: DocumentSource,
        reason: String,
    },

    /// A configuration file that does not deserialize into a policy document
    #[error("Failed to parse {format} config '{path}': {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    /// Generic configuration errors (discovery, missing files, ...)
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system errors tied to a specific path
    #[error("IO error for path '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Untargeted IO errors (stdout, terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of a policy or document failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Cycle,
    RuleSetting,
    UnknownRule,
    UnknownEnvironment,
    Glob,
    Extends,
    Parse,
    Config,
    Io,
    Serialization,
}

impl LintrcError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintrcError::ConfigurationCycle { .. } => ErrorKind::Cycle,
            LintrcError::InvalidRuleSetting { .. } => ErrorKind::RuleSetting,
            LintrcError::UnknownRule { .. } => ErrorKind::UnknownRule,
            LintrcError::UnknownEnvironment { .. } => ErrorKind::UnknownEnvironment,
            LintrcError::InvalidGlobPattern { .. } => ErrorKind::Glob,
            LintrcError::UnresolvedExtends { .. } => ErrorKind::Extends,
            LintrcError::Parse { .. } => ErrorKind::Parse,
            LintrcError::ConfigError { .. } => ErrorKind::Config,
            LintrcError::ReadFailed { .. } | LintrcError::Io(_) => ErrorKind::Io,
            LintrcError::Serialization { .. } => ErrorKind::Serialization,
        }
    }

    /// Whether the error points at something the user can fix in a config document
    pub fn is_config_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Io | ErrorKind::Serialization)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error for a path
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }
}

fn format_chain(chain: &[String]) -> String {
    chain.join(" -> ")
}

fn format_suggestion(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(". Did you mean '{name}'?"),
        None => String::new(),
    }
}
