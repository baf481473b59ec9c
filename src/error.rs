// src/error.rs

//! Error types for feedfetch
//!
//! Only startup-phase conditions and transport/filesystem failures are
//! represented here. Per-package outcomes during resolution are ordinary
//! values (see [`crate::resolver::PackageOutcome`]), not errors.

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize a component (HTTP client, progress bar, ...)
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Network transfer failed or returned a non-success status
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Malformed input text (index data, settings file)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid or unreadable configuration input
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A required input or remote resource does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The feed list yielded no usable repository
    #[error("No valid repositories found in {0}")]
    NoRepositories(String),

    /// No repository produced any package index text
    #[error("Failed to retrieve any Packages data from {0} repositories")]
    NoIndexData(usize),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}
