//! Line-level access to index files
//!
//! Both indexes store records as newline-terminated lines. This module reads
//! those lines (a missing file reads as empty), applies the configured
//! [`MalformedLinePolicy`] to lines the caller could not parse, and replaces
//! files through a temporary sibling so a record is never left half-written.

use super::error::DbError;
use super::types::MalformedLinePolicy;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// One line of an index file, without its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number
    pub number: usize,
    pub bytes: Vec<u8>,
}

/// Read every line of `path`
///
/// A missing file yields no lines. Empty lines are skipped.
///
/// # Errors
///
/// Returns `DbError::Io` for any read failure other than "not found".
pub fn read_lines(path: &Path) -> Result<Vec<RawLine>, DbError> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DbError::io(path, e)),
    };

    Ok(contents
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(idx, line)| RawLine {
            number: idx + 1,
            bytes: line.to_vec(),
        })
        .collect())
}

/// Collects unparseable lines of one file according to a policy
#[derive(Debug)]
pub struct MalformedLines {
    path: PathBuf,
    policy: MalformedLinePolicy,
    kept: Vec<Vec<u8>>,
}

impl MalformedLines {
    pub fn new(path: &Path, policy: MalformedLinePolicy) -> Self {
        Self {
            path: path.to_path_buf(),
            policy,
            kept: Vec::new(),
        }
    }

    /// Report a line that failed to parse
    ///
    /// # Errors
    ///
    /// Returns `DbError::MalformedRecord` under `MalformedLinePolicy::Error`.
    pub fn report(&mut self, line: RawLine) -> Result<(), DbError> {
        warn!(
            path = %self.path.display(),
            line = line.number,
            policy = ?self.policy,
            "malformed index line"
        );
        match self.policy {
            MalformedLinePolicy::Preserve => self.kept.push(line.bytes),
            MalformedLinePolicy::Drop => {}
            MalformedLinePolicy::Error => {
                return Err(DbError::MalformedRecord {
                    path: self.path.clone(),
                    line: line.number,
                });
            }
        }
        Ok(())
    }

    /// Append the preserved lines to a file body being rebuilt
    pub fn append_to(&self, body: &mut Vec<u8>) {
        for line in &self.kept {
            body.extend_from_slice(line);
            body.push(b'\n');
        }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Replace the contents of `path` with `body`, or remove it if `body` is empty
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns `DbError::Io` if the directory, temporary file or removal fails,
/// and `DbError::Persist` if the temporary file cannot be moved into place.
pub fn rewrite(path: &Path, body: &[u8]) -> Result<(), DbError> {
    if body.is_empty() {
        return remove_if_exists(path);
    }

    let parent = path
        .parent()
        .ok_or_else(|| DbError::InvalidPath(path.to_path_buf(), "has no parent directory".into()))?;
    fs::create_dir_all(parent).map_err(|e| DbError::io(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| DbError::io(parent, e))?;
    tmp.write_all(body).map_err(|e| DbError::io(tmp.path(), e))?;
    tmp.persist(path)?;

    debug!(path = %path.display(), bytes = body.len(), "rewrote index file");
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<(), DbError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed empty index file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DbError::io(path, e)),
    }
}
