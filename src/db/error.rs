//! Database-specific error types
//!
//! This module defines all error types that can occur while reading or
//! mutating the on-disk indexes. Errors carry the offending path or name so
//! the CLI can report them without extra context.
//!
//! # Error Types
//!
//! - **`NotInTrackedTree`**: no metadata root above a path, or a path outside the root
//! - **`InvalidTag`**: a tag name outside the allowed alphabet
//! - **`InvalidPath`**: a path that cannot be stored as a file key
//! - **`Io`**: any filesystem failure other than "file absent" on read
//! - **`MalformedRecord`**: a corrupt index line, under the strict line policy
//!
//! All errors implement `std::error::Error` via the `thiserror` crate.

use std::path::PathBuf;
use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// No metadata root could be found, or the path lies outside of it
    #[error("Not inside a tagged directory: {0}")]
    NotInTrackedTree(PathBuf),

    /// Tag name is empty or contains characters outside the allowed set
    #[error("Invalid tag: '{0}'")]
    InvalidTag(String),

    /// Path cannot be represented as a file key
    #[error("Invalid path {0}: {1}")]
    InvalidPath(PathBuf, String),

    /// `initialize` was called on a directory that already has metadata
    #[error("Already initialized: {0}")]
    AlreadyInitialized(PathBuf),

    /// Filesystem error while touching an index file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Replacing an index file with its rewritten copy failed
    #[error("Error while replacing index file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Corrupt line in an index file
    #[error("Malformed record in {path} at line {line}")]
    MalformedRecord { path: PathBuf, line: usize },
}

impl DbError {
    /// Attach a path to an I/O error
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
