//! Error types for the MindCare API service.

use thiserror::Error;

/// Main error type for service startup and configuration.
///
/// Request-time outcomes (admit, reject, upstream fallback) are ordinary data
/// and never surface here.
#[derive(Error, Debug)]
pub enum MindcareError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MindCare operations.
pub type Result<T> = std::result::Result<T, MindcareError>;
