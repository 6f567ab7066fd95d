//! Centralized error types for maildecode.
//!
//! None of these ever escape [`crate::parser::message::decode_message`]:
//! the pipeline logs them and degrades to an empty body instead.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the maildecode library.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("Message file not found: {0}")]
    FileNotFound(PathBuf),

    /// The raw message is larger than the configured limit.
    #[error("Message of {size} bytes exceeds the limit of {limit} bytes")]
    MessageTooLarge { size: usize, limit: usize },

    /// Multipart parts are nested deeper than the configured limit.
    #[error("Multipart nesting exceeds the maximum depth of {0}")]
    NestingTooDeep(usize),

    /// A transfer-encoding or encoded-word decoding error.
    #[error("Content decoding error: {0}")]
    Content(String),

    /// The configuration file could not be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, DecodeError>`.
pub type Result<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<base64::DecodeError> for DecodeError {
    fn from(source: base64::DecodeError) -> Self {
        Self::Content(format!("base64: {source}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_too_large() {
        let err = DecodeError::MessageTooLarge { size: 10, limit: 5 };
        assert_eq!(
            err.to_string(),
            "Message of 10 bytes exceeds the limit of 5 bytes"
        );
    }

    #[test]
    fn test_io_helper_keeps_path() {
        let err = DecodeError::io(
            "/tmp/x.eml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x.eml"));
    }
}
