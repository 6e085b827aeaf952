//! Value types shared by both indexes
//!
//! - **`FileKey`**: root-relative path of a tracked file, as stored on disk
//! - **`UpdateOp`**: whether a mutation adds to or removes from a set
//! - **`MalformedLinePolicy`**: what a rewrite does with corrupt index lines
//!
//! `FileKey` guarantees that the key can be written into the line-oriented
//! index files: it is valid UTF-8 and holds neither a newline nor a NUL byte.

use super::error::DbError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Root-relative path of a tracked file, e.g. `/docs/a.txt`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileKey(String);

impl FileKey {
    /// # Errors
    ///
    /// Returns `DbError::InvalidPath` if the key contains a newline or NUL byte.
    pub fn new(key: impl Into<String>) -> Result<Self, DbError> {
        let key = key.into();
        if key.contains('\n') {
            return Err(DbError::InvalidPath(key.into(), "contains a newline".into()));
        }
        if key.contains('\0') {
            return Err(DbError::InvalidPath(key.into(), "contains a NUL byte".into()));
        }
        Ok(Self(key))
    }

    /// Key as read back from an index file, where the line format already
    /// rules out newlines
    pub(crate) fn from_record(key: &str) -> Self {
        Self(key.to_string())
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Key without the leading separator, suitable for joining onto the root
    #[must_use]
    pub fn relative(&self) -> &Path {
        Path::new(self.0.trim_start_matches('/'))
    }
}

impl AsRef<str> for FileKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for FileKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of a set mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Add,
    Remove,
}

impl UpdateOp {
    /// Apply this operation to `current`, returning the resulting set
    #[must_use]
    pub fn apply<T: Ord + Clone>(self, current: &BTreeSet<T>, items: &BTreeSet<T>) -> BTreeSet<T> {
        match self {
            Self::Add => current.union(items).cloned().collect(),
            Self::Remove => current.difference(items).cloned().collect(),
        }
    }
}

/// How index rewrites treat lines that cannot be parsed
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Keep the line verbatim after the well-formed records
    #[default]
    Preserve,
    /// Discard the line on the next rewrite
    Drop,
    /// Refuse to read the file
    Error,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
