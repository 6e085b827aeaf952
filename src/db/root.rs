//! Metadata root discovery and path normalization
//!
//! A tagged tree is any directory holding a `.tagger-meta` subdirectory.
//! `Root::locate` finds the nearest such directory at or above a start path,
//! and `Root::normalize` turns filesystem paths below it into [`FileKey`]s.
//!
//! Paths are made absolute and normalized lexically: `.` and `..` are
//! resolved without consulting the filesystem, so symlinks are not followed
//! and the file does not need to exist.

use super::error::DbError;
use super::types::FileKey;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Name of the metadata directory at the top of a tagged tree
pub const META_DIR_NAME: &str = ".tagger-meta";

const FILES_DIR_NAME: &str = "files";
const TAGS_DIR_NAME: &str = "tags";

/// A located tagged tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    base: PathBuf,
    meta: PathBuf,
}

impl Root {
    /// Create the metadata directories under `base_dir`
    ///
    /// Missing parents of `base_dir` are created as well.
    ///
    /// # Errors
    ///
    /// Returns `DbError::AlreadyInitialized` if `base_dir` already holds a
    /// metadata directory, or `DbError::Io` if the directories cannot be
    /// created.
    pub fn initialize<P: AsRef<Path>>(base_dir: P) -> Result<Self, DbError> {
        let base = absolutize(base_dir.as_ref())?;
        let meta = base.join(META_DIR_NAME);
        if meta.exists() {
            return Err(DbError::AlreadyInitialized(base));
        }

        for dir in [meta.join(FILES_DIR_NAME), meta.join(TAGS_DIR_NAME)] {
            fs::create_dir_all(&dir).map_err(|e| DbError::io(&dir, e))?;
        }
        info!(root = %base.display(), "initialized tagged tree");

        Ok(Self { base, meta })
    }

    /// Find the nearest tagged tree at or above `start`
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotInTrackedTree` if the filesystem root is reached
    /// without finding a metadata directory.
    pub fn locate<P: AsRef<Path>>(start: P) -> Result<Self, DbError> {
        let start = start.as_ref();
        let absolute = absolutize(start)?;

        let mut dir = absolute.as_path();
        loop {
            let meta = dir.join(META_DIR_NAME);
            if meta.is_dir() {
                debug!(root = %dir.display(), "located tagged tree");
                return Ok(Self {
                    base: dir.to_path_buf(),
                    meta,
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return Err(DbError::NotInTrackedTree(start.to_path_buf())),
            }
        }
    }

    /// Convert a filesystem path into a root-relative file key
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotInTrackedTree` if the path is not strictly below
    /// the root, or `DbError::InvalidPath` if it is not valid UTF-8 or cannot
    /// be stored in an index line.
    pub fn normalize<P: AsRef<Path>>(&self, path: P) -> Result<FileKey, DbError> {
        let absolute = absolutize(path.as_ref())?;
        let relative = absolute
            .strip_prefix(&self.base)
            .map_err(|_| DbError::NotInTrackedTree(absolute.clone()))?;

        let mut key = String::new();
        for component in relative.components() {
            let Component::Normal(part) = component else {
                continue;
            };
            let part = part
                .to_str()
                .ok_or_else(|| DbError::InvalidPath(absolute.clone(), "Invalid UTF-8 in path".into()))?;
            key.push('/');
            key.push_str(part);
        }

        if key.is_empty() {
            return Err(DbError::NotInTrackedTree(absolute));
        }
        FileKey::new(key)
    }

    /// Absolute path of the file a key refers to
    #[must_use]
    pub fn resolve(&self, key: &FileKey) -> PathBuf {
        self.base.join(key.relative())
    }

    /// Directory holding the metadata directory
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The metadata directory itself
    #[must_use]
    pub fn meta_dir(&self) -> &Path {
        &self.meta
    }

    /// Directory of file-index bucket files
    #[must_use]
    pub fn files_dir(&self) -> PathBuf {
        self.meta.join(FILES_DIR_NAME)
    }

    /// Directory of tag-index shard directories
    #[must_use]
    pub fn tags_dir(&self) -> PathBuf {
        self.meta.join(TAGS_DIR_NAME)
    }
}

/// Make `path` absolute against the working directory and fold `.`/`..`
fn absolutize(path: &Path) -> Result<PathBuf, DbError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| DbError::io(path, e))?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
