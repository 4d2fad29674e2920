//! Error types for the face gesture library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Recorded frame data could not be decoded
    #[error("Frame format error: {0}")]
    FrameFormat(#[from] serde_yaml::Error),

    /// Camera or landmark inference collaborator is not available
    #[error("Frame source unavailable: {0}")]
    SourceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Lifecycle operation called in the wrong state
    #[error("Session error: {0}")]
    SessionError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
