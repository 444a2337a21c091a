//! Cinder Core - shared foundation for the Cinder coding assistant
//!
//! This crate provides the pieces the agent and CLI build on:
//! - Configuration management (`.cinder/config.toml` + environment)
//! - File I/O helpers with typed errors
//! - Unified diff generation

pub mod config;
pub mod diff;
pub mod error;
pub mod file_io;

pub use config::{Config, ConfigError};
pub use diff::{diff_against_file, unified_diff};
pub use error::CoreError;
pub use file_io::FileIoError;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
