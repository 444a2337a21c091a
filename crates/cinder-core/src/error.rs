//! Error types for Cinder Core
//!
//! This module provides a unified error type for core operations.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::file_io::FileIoError;

/// Top-level error type for Cinder Core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File I/O error
    #[error("File I/O error: {0}")]
    FileIo(#[from] FileIoError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::FileIo(FileIoError::from(err))
    }
}

impl From<String> for CoreError {
    fn from(msg: String) -> Self {
        CoreError::Other(msg)
    }
}

impl From<&str> for CoreError {
    fn from(msg: &str) -> Self {
        CoreError::Other(msg.to_string())
    }
}
