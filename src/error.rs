//! Error types and handling infrastructure for lugat.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. `anyhow` is only used at the binary boundary in `main`.
//!
//! Most failures inside the lookup path are not fatal: the controller turns a failed
//! query into an empty result. The variants here exist so that loading, configuration,
//! and terminal setup can report something actionable before the UI starts.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for lugat operations.
#[derive(Error, Debug)]
pub enum LugatError {
    /// File system related errors (file not found, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Dictionary file not found specifically (common case for user feedback)
    #[error("Dictionary not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Dictionary dump could not be parsed
    #[error("Malformed dictionary data: {message}")]
    DecodeError { message: String },

    /// Compression format detection or decompression errors
    #[error("Compression error: {message}")]
    CompressionError { message: String },

    /// A prefix or article query against the store failed
    #[error("Query failed: {message}")]
    QueryError { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for lugat operations.
pub type Result<T> = std::result::Result<T, LugatError>;

impl LugatError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a DecodeError with a descriptive message
    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
        }
    }

    /// Create a CompressionError with a descriptive message
    pub fn compression(message: impl Into<String>) -> Self {
        Self::CompressionError {
            message: message.into(),
        }
    }

    /// Create a QueryError with a descriptive message
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for LugatError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

impl From<serde_json::Error> for LugatError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let path = PathBuf::from("/test/crh-ru.json");

        let not_found = LugatError::FileNotFound { path };
        assert_eq!(not_found.to_string(), "Dictionary not found: /test/crh-ru.json");

        let query = LugatError::query("store offline");
        assert_eq!(query.to_string(), "Query failed: store offline");

        let config = LugatError::config("expected a table");
        assert_eq!(config.to_string(), "Configuration error: expected a table");
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            LugatError::decode("bad json"),
            LugatError::DecodeError { .. }
        ));
        assert!(matches!(
            LugatError::ui("resize failed"),
            LugatError::UIError { .. }
        ));
        assert!(matches!(
            LugatError::other("unknown"),
            LugatError::Other { .. }
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: LugatError = io_err.into();

        match err {
            LugatError::FileError { message, .. } => assert_eq!(message, "Permission denied"),
            other => panic!("Expected FileError variant, got {other:?}"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LugatError = json_err.into();
        assert!(matches!(err, LugatError::DecodeError { .. }));
    }
}
