// src/error.rs

use thiserror::Error;

/// Core error types for pkgsetcomp
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest download failed
    #[error("Download error: {0}")]
    Download(String),

    /// An external command exited unsuccessfully
    #[error("Command `{command}` failed: {status}")]
    CommandFailed { command: String, status: String },

    /// Malformed input (status database, config file)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using pkgsetcomp's Error type
pub type Result<T> = std::result::Result<T, Error>;
