//! Error types for Glossa
//!
//! This module defines the error types used across the crate. Uses
//! `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.
//!
//! Retrieval itself never fails; these errors come from loading the
//! glossary, reading configuration, and talking to the answer generator.

use thiserror::Error;

/// The primary error type for Glossa operations.
#[derive(Error, Debug)]
pub enum GlossaError {
    /// Configuration-related errors (invalid config file, bad env overrides, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Glossary content errors (unsupported layout, unusable path, etc.)
    #[error("Glossary error: {0}")]
    Glossary(String),

    /// Answer generator errors (API failures, unexpected responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Resource not found (glossary file, config file, etc.)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A specialized `Result` type for Glossa operations.
pub type Result<T> = std::result::Result<T, GlossaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GlossaError::Config("GLOSSA_MAX_ENTRIES must be a number".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GLOSSA_MAX_ENTRIES must be a number"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GlossaError = io_err.into();
        assert!(matches!(err, GlossaError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
        let err: GlossaError = json_err.into();
        assert!(matches!(err, GlossaError::Json(_)));
    }

    #[test]
    fn test_not_found_display() {
        let err = GlossaError::NotFound("Glossary file not found: /tmp/x.json".to_string());
        assert_eq!(
            err.to_string(),
            "Not found: Glossary file not found: /tmp/x.json"
        );
    }
}
