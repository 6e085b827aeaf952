//! Testing utilities for tagger
//!
//! Provides `TestTree`, a temporary tagged directory tree that is removed
//! when the wrapper goes out of scope.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::{Database, Root};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wrapper for a temporary, initialized tagged tree
///
/// The tree lives in a subdirectory of a fresh temporary directory, so paths
/// next to it (see [`TestTree::outside_path`]) are guaranteed to be outside.
///
/// # Examples
/// ```ignore
/// let tree = TestTree::new();
/// tree.db().file_add_tags(tree.path().join("a.txt"), &["draft"]).unwrap();
/// // Directory removed when `tree` is dropped
/// ```
pub struct TestTree {
    dir: TempDir,
    base: PathBuf,
    db: Database,
}

impl TestTree {
    /// Create and initialize a new tree
    ///
    /// # Panics
    /// Panics if the temporary directory or metadata cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let base = dir.path().join("tree");
        let db = Database::initialize(&base).expect("Failed to initialize test tree");
        Self { dir, base, db }
    }

    /// Database handle for the tree
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub const fn root(&self) -> &Root {
        self.db.root()
    }

    /// Base directory of the tree
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base
    }

    /// A path next to the tree, never inside it
    #[must_use]
    pub fn outside_path(&self, name: &str) -> PathBuf {
        self.dir.path().join("outside").join(name)
    }

    /// Create a real file inside the tree, with parents
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, relative: &str) -> PathBuf {
        let path = self.base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, b"test content").expect("Failed to write test file");
        path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::META_DIR_NAME;

    #[test]
    fn test_tree_is_initialized() {
        let tree = TestTree::new();
        assert!(tree.path().join(META_DIR_NAME).is_dir());
        assert_eq!(tree.root().base(), tree.path());
    }

    #[test]
    fn test_tree_cleanup() {
        let path = {
            let tree = TestTree::new();
            tree.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_outside_path_is_outside() {
        let tree = TestTree::new();
        let outside = tree.outside_path("x.txt");
        assert!(tree.root().normalize(outside).is_err());
    }

    #[test]
    fn test_create_file() {
        let tree = TestTree::new();
        let path = tree.create_file("sub/a.txt");
        assert_eq!(fs::read_to_string(path).unwrap(), "test content");
    }
}
