//! Error types and handling for lintseed operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lintseed operations
#[derive(Debug, Error)]
pub enum LintseedError {
    /// A corpus file could not be tokenized or structured
    #[error(
        "Automatic configuration failed. No files were able to be parsed ({}:{line}:{column}: {message})",
        path.display()
    )]
    CorpusParse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// No file matched the requested patterns
    #[error("Automatic configuration failed. No files matched the patterns: {patterns}")]
    EmptyCorpus { patterns: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule lookup or option errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Discovery was cancelled between trials
    #[error("Automatic configuration cancelled after {completed} of {total} trials")]
    Cancelled { completed: usize, total: usize },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    EmptyCorpus,
    Config,
    Rule,
    Io,
    Cancelled,
    Internal,
}

impl LintseedError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintseedError::CorpusParse { .. } => ErrorKind::Parse,
            LintseedError::EmptyCorpus { .. } => ErrorKind::EmptyCorpus,
            LintseedError::ConfigError { .. } => ErrorKind::Config,
            LintseedError::RuleError { .. } => ErrorKind::Rule,
            LintseedError::IoError { .. } => ErrorKind::Io,
            LintseedError::Cancelled { .. } => ErrorKind::Cancelled,
            LintseedError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the caller may continue with other work)
    ///
    /// Corpus errors are terminal for a discovery run; a rule error or an
    /// unreadable file only affects the item that raised it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Rule | ErrorKind::Io)
    }

    /// Create a corpus parse error
    pub fn corpus_parse(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::CorpusParse {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an empty corpus error from the patterns that matched nothing
    pub fn empty_corpus<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self::EmptyCorpus {
            patterns: patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for LintseedError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
