//! Error types for Folio.
//!
//! Library crates use [`FolioError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Folio operations.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching the content document.
    #[error("network error: {0}")]
    Network(String),

    /// Content document or markup parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A region selector pattern could not be compiled.
    #[error("invalid selector {pattern:?}: {message}")]
    Selector { pattern: String, message: String },

    /// A DOM mutation could not be applied.
    #[error("dom error: {0}")]
    Dom(String),

    /// Persisted key-value store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a selector error for the given pattern.
    pub fn selector(pattern: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Selector {
            pattern: pattern.into(),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = FolioError::config("missing [site] section");
        assert_eq!(err.to_string(), "config error: missing [site] section");

        let err = FolioError::selector("#about >", "unexpected end of input");
        assert!(err.to_string().contains("#about >"));
        assert!(err.to_string().contains("unexpected end"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = FolioError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("missing.json"));
    }
}
