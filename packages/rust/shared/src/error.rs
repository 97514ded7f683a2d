//! Error types for docsgen.
//!
//! Library crates use [`DocsgenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docsgen operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsgenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A file requested from a repository does not exist there.
    #[error("file not found in repository: {path}")]
    NotFound { path: String },

    /// Network/HTTP error while talking to the repository provider.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed payload from the repository provider.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid category definition or override entry.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsgenError>;

impl DocsgenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a not-found error for a repository-relative path.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "the file is simply not there".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocsgenError::config("no repositories configured");
        assert_eq!(err.to_string(), "config error: no repositories configured");

        let err = DocsgenError::not_found("docs/missing.md");
        assert!(err.to_string().contains("docs/missing.md"));
    }

    #[test]
    fn not_found_is_recognised() {
        assert!(DocsgenError::not_found("README.md").is_not_found());
        assert!(!DocsgenError::validation("bad").is_not_found());
    }
}
