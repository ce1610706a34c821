//! Error types for the aerodesk service
//!
//! These cover startup-time failures only (bad configuration, unreadable
//! reference dataset). Nothing on the request path maps to this type: a
//! chat request always produces a well-formed answer, and the flight
//! provider has its own non-fatal error kind in [`crate::flights`].

use thiserror::Error;

/// Main error type for the aerodesk service
#[derive(Error, Debug)]
pub enum AerodeskError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Reference-dataset loading errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AerodeskError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = AerodeskError::config("missing provider key");
        assert!(matches!(config_err, AerodeskError::Config { .. }));

        let dataset_err = AerodeskError::dataset("truncated row");
        assert!(matches!(dataset_err, AerodeskError::Dataset { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AerodeskError = io_err.into();
        assert!(matches!(err, AerodeskError::Io { .. }));
    }
}
