//! Tag storage for a directory tree
//!
//! Provides a clean API for associating files with tags, stored as plain
//! files under the tree's `.tagger-meta` directory.
//!
//! Uses two independent indexes for bidirectional lookups:
//! - `files/<shard>`: bucket files mapping file keys to tags
//! - `tags/<shard>/<tag>`: one file per tag listing its file keys
//!
//! [`Database`] keeps the two in step: every mutation updates the index it
//! enters through and then mirrors the change into the other one, exactly
//! one level deep.
//!
//! # Concurrency
//!
//! Nothing is locked. Two processes mutating the same tree at once may lose
//! updates; callers must serialize writers themselves.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub mod check;
pub mod error;
pub mod file_index;
pub mod record;
pub mod root;
pub mod shard;
pub mod tag;
pub mod tag_index;
pub mod types;

pub use check::Inconsistency;
pub use error::DbError;
pub use file_index::FileIndex;
pub use root::{META_DIR_NAME, Root};
pub use tag::{TagName, is_valid_tag};
pub use tag_index::TagIndex;
pub use types::{FileKey, MalformedLinePolicy, UpdateOp};

/// Handle on one tagged tree
///
/// The root is resolved once when the handle is opened and reused by every
/// call made through it.
#[derive(Debug, Clone)]
pub struct Database {
    root: Root,
    policy: MalformedLinePolicy,
}

impl Database {
    /// Opens the tagged tree containing `start`
    ///
    /// # Examples
    /// ```no_run
    /// use tagger::db::Database;
    /// let db = Database::open(".").unwrap();
    /// db.file_add_tags("notes.txt", &["draft"]).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotInTrackedTree` if no metadata directory exists at
    /// or above `start`.
    pub fn open<P: AsRef<Path>>(start: P) -> Result<Self, DbError> {
        Ok(Self::from_root(Root::locate(start)?))
    }

    /// Creates a new tagged tree at `base_dir` and opens it
    ///
    /// # Errors
    ///
    /// Returns `DbError::AlreadyInitialized` if the tree already exists, or
    /// `DbError::Io` if the metadata directories cannot be created.
    pub fn initialize<P: AsRef<Path>>(base_dir: P) -> Result<Self, DbError> {
        Ok(Self::from_root(Root::initialize(base_dir)?))
    }

    /// Wraps an already located root
    #[must_use]
    pub fn from_root(root: Root) -> Self {
        Self {
            root,
            policy: MalformedLinePolicy::default(),
        }
    }

    /// Sets how rewrites treat unparseable index lines
    #[must_use]
    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn root(&self) -> &Root {
        &self.root
    }

    #[must_use]
    pub const fn policy(&self) -> MalformedLinePolicy {
        self.policy
    }

    fn file_index(&self) -> FileIndex<'_> {
        FileIndex::new(&self.root, self.policy)
    }

    fn tag_index(&self) -> TagIndex<'_> {
        TagIndex::new(&self.root, self.policy)
    }

    /// Add tags to a file
    ///
    /// # Arguments
    /// * `path` - Filesystem path of the file, inside the tree
    /// * `tags` - Tags to add; surrounding whitespace is ignored
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidTag` or `DbError::NotInTrackedTree` before
    /// anything is written, or `DbError::Io` if an index cannot be updated.
    pub fn file_add_tags<P: AsRef<Path>, S: AsRef<str>>(
        &self,
        path: P,
        tags: &[S],
    ) -> Result<(), DbError> {
        self.update_file(path.as_ref(), tags, UpdateOp::Add)
    }

    /// Remove tags from a file
    ///
    /// # Errors
    ///
    /// Same as [`Database::file_add_tags`].
    pub fn file_remove_tags<P: AsRef<Path>, S: AsRef<str>>(
        &self,
        path: P,
        tags: &[S],
    ) -> Result<(), DbError> {
        self.update_file(path.as_ref(), tags, UpdateOp::Remove)
    }

    /// Get the sorted tags of a file; empty if it has none
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotInTrackedTree` for paths outside the tree, or
    /// `DbError` if the index cannot be read.
    pub fn file_get_tags<P: AsRef<Path>>(&self, path: P) -> Result<Vec<TagName>, DbError> {
        let key = self.root.normalize(path)?;
        self.file_index().get_tags(&key)
    }

    /// Add files to a tag
    ///
    /// # Arguments
    /// * `tag` - Tag to extend
    /// * `paths` - Filesystem paths of the files, inside the tree
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidTag` or `DbError::NotInTrackedTree` before
    /// anything is written, or `DbError::Io` if an index cannot be updated.
    pub fn tag_add_files<P: AsRef<Path>>(&self, tag: &str, paths: &[P]) -> Result<(), DbError> {
        self.update_tag(tag, paths, UpdateOp::Add)
    }

    /// Remove files from a tag
    ///
    /// # Errors
    ///
    /// Same as [`Database::tag_add_files`].
    pub fn tag_remove_files<P: AsRef<Path>>(&self, tag: &str, paths: &[P]) -> Result<(), DbError> {
        self.update_tag(tag, paths, UpdateOp::Remove)
    }

    /// Get the sorted keys of the files carrying a tag; empty if none
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidTag` for an invalid name, or `DbError` if the
    /// index cannot be read.
    pub fn tag_get_files(&self, tag: &str) -> Result<Vec<FileKey>, DbError> {
        let tag = TagName::parse(tag)?;
        self.tag_index().get_files(&tag)
    }

    /// Every tag in the tree with the number of files carrying it
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the tag index cannot be read.
    pub fn list_tags(&self) -> Result<Vec<(TagName, usize)>, DbError> {
        Ok(self
            .tag_index()
            .list()?
            .into_iter()
            .map(|(tag, files)| (tag, files.len()))
            .collect())
    }

    /// Every tagged file in the tree with its tags, sorted by key
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the file index cannot be read.
    pub fn list_files(&self) -> Result<Vec<(FileKey, Vec<TagName>)>, DbError> {
        self.file_index().list()
    }

    /// Report file/tag pairs recorded in only one of the indexes
    ///
    /// # Errors
    ///
    /// Returns `DbError` if either index cannot be read.
    pub fn check(&self) -> Result<Vec<Inconsistency>, DbError> {
        check::find(&self.file_index(), &self.tag_index())
    }

    /// Restore symmetry for the given pairs by adding their missing side
    ///
    /// # Errors
    ///
    /// Returns `DbError` if an index cannot be rewritten.
    pub fn repair(&self, issues: &[Inconsistency]) -> Result<usize, DbError> {
        check::repair(&self.file_index(), &self.tag_index(), issues)
    }

    // Propagating updates. Each enters through one index and mirrors into the
    // other without re-entering, so propagation never recurses.

    fn update_file<S: AsRef<str>>(&self, path: &Path, tags: &[S], op: UpdateOp) -> Result<(), DbError> {
        let tags: BTreeSet<TagName> = TagName::parse_all(tags)?.into_iter().collect();
        let key = self.root.normalize(path)?;
        if tags.is_empty() {
            return Ok(());
        }

        if !self.file_index().update_tags(&key, &tags, op)? {
            return Ok(());
        }

        let keys = BTreeSet::from([key]);
        let tag_index = self.tag_index();
        for tag in &tags {
            tag_index.update_files(tag, &keys, op)?;
        }
        debug!(?op, tags = tags.len(), "propagated file update to tag index");
        Ok(())
    }

    fn update_tag<P: AsRef<Path>>(&self, tag: &str, paths: &[P], op: UpdateOp) -> Result<(), DbError> {
        let tag = TagName::parse(tag)?;
        let keys = paths
            .iter()
            .map(|p| self.root.normalize(p))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if keys.is_empty() {
            return Ok(());
        }

        self.tag_index().update_files(&tag, &keys, op)?;

        let tags = BTreeSet::from([tag]);
        let file_index = self.file_index();
        for key in &keys {
            file_index.update_tags(key, &tags, op)?;
        }
        debug!(?op, files = keys.len(), "propagated tag update to file index");
        Ok(())
    }
}
