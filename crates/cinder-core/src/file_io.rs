//! File I/O utilities for Cinder
//!
//! This module provides safe, high-level file I/O operations with proper
//! error handling. The tool layer maps these typed errors to the text
//! results the model sees.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file I/O operations
#[derive(Error, Debug)]
pub enum FileIoError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Invalid UTF-8 in file
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(PathBuf),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Path is a directory, not a file
    #[error("Path is a directory, not a file: {0}")]
    IsDirectory(PathBuf),

    /// Path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Read a file and return its contents as a UTF-8 string
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String, FileIoError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FileIoError::NotFound(path.to_path_buf()));
    }

    if path.is_dir() {
        return Err(FileIoError::IsDirectory(path.to_path_buf()));
    }

    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) => match e.kind() {
            io::ErrorKind::NotFound => Err(FileIoError::NotFound(path.to_path_buf())),
            io::ErrorKind::PermissionDenied => {
                Err(FileIoError::PermissionDenied(path.to_path_buf()))
            }
            io::ErrorKind::InvalidData => Err(FileIoError::InvalidUtf8(path.to_path_buf())),
            _ => Err(FileIoError::Io(e)),
        },
    }
}

/// Write content to a file, overwriting and creating parent directories if
/// needed. No atomic rename, no backup of the previous version.
pub fn write_file<P: AsRef<Path>, C: AsRef<str>>(
    path: P,
    content: C,
) -> Result<(), FileIoError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    match fs::write(path, content.as_ref()) {
        Ok(()) => Ok(()),
        Err(e) => match e.kind() {
            io::ErrorKind::PermissionDenied => {
                Err(FileIoError::PermissionDenied(path.to_path_buf()))
            }
            _ => Err(FileIoError::Io(e)),
        },
    }
}

/// Check if a file exists
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    path.exists() && path.is_file()
}

/// List all files under a directory recursively. Directories are descended
/// into but never listed themselves.
pub fn list_files_recursive<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, FileIoError> {
    let dir = dir.as_ref();

    if !dir.exists() {
        return Err(FileIoError::NotFound(dir.to_path_buf()));
    }

    if !dir.is_dir() {
        return Err(FileIoError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    visit_dirs(dir, &mut files)?;
    Ok(files)
}

fn visit_dirs(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), FileIoError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            visit_dirs(&path, files)?;
        }
    }
    Ok(())
}

/// Get the file extension as a lowercase string
pub fn get_extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}
