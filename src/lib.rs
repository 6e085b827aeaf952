//! Tagger - tag files in a directory tree
//!
//! This library associates files with tags and keeps two plain-text indexes
//! (file → tags and tag → files) under a `.tagger-meta` directory at the top
//! of the tree. See [`db::Database`] for the storage API.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod output;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TaggerError {
    /// Database error
    #[error("{0}")]
    DbError(#[from] db::DbError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
