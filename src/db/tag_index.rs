//! Tag → files index
//!
//! Each tag owns one file at `tags/<shard>/<tag name>`, holding the keys of
//! its files one per line in sorted order. Updates always rewrite the file;
//! a tag left without files has its file removed.

use super::error::DbError;
use super::record::{self, MalformedLines};
use super::root::Root;
use super::shard;
use super::tag::TagName;
use super::types::{FileKey, MalformedLinePolicy, UpdateOp};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Access to the tag → files side of a tagged tree
pub struct TagIndex<'a> {
    root: &'a Root,
    policy: MalformedLinePolicy,
}

impl<'a> TagIndex<'a> {
    #[must_use]
    pub const fn new(root: &'a Root, policy: MalformedLinePolicy) -> Self {
        Self { root, policy }
    }

    fn record_path(&self, tag: &TagName) -> PathBuf {
        self.root
            .tags_dir()
            .join(shard::tag_shard(tag))
            .join(&**tag)
    }

    fn load(&self, path: &Path) -> Result<(BTreeSet<FileKey>, MalformedLines), DbError> {
        let mut files = BTreeSet::new();
        let mut malformed = MalformedLines::new(path, self.policy);

        for line in record::read_lines(path)? {
            match std::str::from_utf8(&line.bytes).map(str::trim) {
                Ok("") => {}
                Ok(key) => {
                    files.insert(FileKey::from_record(key));
                }
                Err(_) => malformed.report(line)?,
            }
        }
        Ok((files, malformed))
    }

    /// Sorted keys of the files carrying `tag`; empty if the tag has no record
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the record cannot be read.
    pub fn get_files(&self, tag: &TagName) -> Result<Vec<FileKey>, DbError> {
        let (files, _) = self.load(&self.record_path(tag))?;
        Ok(files.into_iter().collect())
    }

    /// Add or remove `keys` on `tag`'s record
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the record cannot be read or rewritten.
    pub fn update_files(
        &self,
        tag: &TagName,
        keys: &BTreeSet<FileKey>,
        op: UpdateOp,
    ) -> Result<(), DbError> {
        let path = self.record_path(tag);
        let (current, malformed) = self.load(&path)?;
        let updated = op.apply(&current, keys);

        let mut body = Vec::new();
        for key in &updated {
            body.extend_from_slice(key.as_bytes());
            body.push(b'\n');
        }
        malformed.append_to(&mut body);

        record::rewrite(&path, &body)?;
        debug!(tag = %tag, ?op, files = updated.len(), "updated tag record");
        Ok(())
    }

    /// Every tag record in the tree with its files, sorted by tag
    ///
    /// # Errors
    ///
    /// Returns `DbError` if a shard directory or record cannot be read.
    pub fn list(&self) -> Result<Vec<(TagName, Vec<FileKey>)>, DbError> {
        let dir = self.root.tags_dir();
        let mut all = Vec::new();

        for shard_dir in read_dir_if_exists(&dir)? {
            let shard_name = file_name(&shard_dir);
            if !shard_name.as_deref().is_some_and(shard::is_shard_name) || !shard_dir.is_dir() {
                debug!(path = %shard_dir.display(), "skipping non-shard entry");
                continue;
            }

            for record_path in read_dir_if_exists(&shard_dir)? {
                let Some(tag) = tag_for_record(&record_path, shard_name.as_deref()) else {
                    debug!(path = %record_path.display(), "skipping non-tag entry");
                    continue;
                };
                let (files, _) = self.load(&record_path)?;
                if !files.is_empty() {
                    all.push((tag, files.into_iter().collect()));
                }
            }
        }

        all.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(all)
    }
}

fn read_dir_if_exists(dir: &Path) -> Result<Vec<PathBuf>, DbError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DbError::io(dir, e)),
    };
    entries
        .map(|entry| entry.map(|e| e.path()).map_err(|e| DbError::io(dir, e)))
        .collect()
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(String::from)
}

/// Tag stored at `path`, if the file is a record placed in its own shard
fn tag_for_record(path: &Path, shard_name: Option<&str>) -> Option<TagName> {
    if !path.is_file() {
        return None;
    }
    let name = file_name(path)?;
    let tag = TagName::parse(&name).ok()?;
    (*tag == *name && Some(shard::tag_shard(&tag).as_str()) == shard_name).then_some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTree;

    fn keys(paths: &[&str]) -> BTreeSet<FileKey> {
        paths.iter().map(|p| FileKey::new(*p).unwrap()).collect()
    }

    fn tag(name: &str) -> TagName {
        TagName::parse(name).unwrap()
    }

    #[test]
    fn test_get_files_missing_record() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());

        assert!(index.get_files(&tag("nothing")).unwrap().is_empty());
    }

    #[test]
    fn test_add_creates_shard_and_record() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());
        let draft = tag("draft");

        index
            .update_files(&draft, &keys(&["/b.txt", "/a.txt"]), UpdateOp::Add)
            .unwrap();

        let path = tree
            .root()
            .tags_dir()
            .join(shard::tag_shard("draft"))
            .join("draft");
        assert_eq!(fs::read(path).unwrap(), b"/a.txt\n/b.txt\n");
    }

    #[test]
    fn test_remove_keeps_other_files() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());
        let draft = tag("draft");

        index
            .update_files(&draft, &keys(&["/a.txt", "/b.txt"]), UpdateOp::Add)
            .unwrap();
        index
            .update_files(&draft, &keys(&["/a.txt"]), UpdateOp::Remove)
            .unwrap();

        let files = index.get_files(&draft).unwrap();
        assert_eq!(files, keys(&["/b.txt"]).into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_record_is_deleted() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());
        let draft = tag("draft");

        index
            .update_files(&draft, &keys(&["/a.txt"]), UpdateOp::Add)
            .unwrap();
        index
            .update_files(&draft, &keys(&["/a.txt"]), UpdateOp::Remove)
            .unwrap();

        let path = tree
            .root()
            .tags_dir()
            .join(shard::tag_shard("draft"))
            .join("draft");
        assert!(!path.exists());
    }

    #[test]
    fn test_hand_edited_lines_are_trimmed() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());
        let draft = tag("draft");
        let path = index.record_path(&draft);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"/a.txt \r\n \r\n/b.txt\r\n").unwrap();

        assert_eq!(
            index.get_files(&draft).unwrap(),
            keys(&["/a.txt", "/b.txt"]).into_iter().collect::<Vec<_>>()
        );

        index
            .update_files(&draft, &keys(&["/c.txt"]), UpdateOp::Add)
            .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"/a.txt\n/b.txt\n/c.txt\n");
    }

    #[test]
    fn test_tag_with_space_is_a_filename() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());
        let todo = tag("to do");

        index
            .update_files(&todo, &keys(&["/a.txt"]), UpdateOp::Add)
            .unwrap();
        assert_eq!(index.get_files(&todo).unwrap().len(), 1);
    }

    #[test]
    fn test_list_skips_foreign_entries() {
        let tree = TestTree::new();
        let index = TagIndex::new(tree.root(), MalformedLinePolicy::default());
        index
            .update_files(&tag("beta"), &keys(&["/a.txt"]), UpdateOp::Add)
            .unwrap();
        index
            .update_files(&tag("alpha"), &keys(&["/a.txt", "/b.txt"]), UpdateOp::Add)
            .unwrap();

        fs::write(tree.root().tags_dir().join("README"), b"not a shard").unwrap();
        let other = if shard::tag_shard("gamma") == "00" { "01" } else { "00" };
        let wrong_shard = tree.root().tags_dir().join(other);
        fs::create_dir_all(&wrong_shard).unwrap();
        fs::write(wrong_shard.join("gamma"), b"/c.txt\n").unwrap();

        let listed: Vec<(String, usize)> = index
            .list()
            .unwrap()
            .into_iter()
            .map(|(t, files)| (t.into_string(), files.len()))
            .collect();
        assert_eq!(listed, vec![("alpha".into(), 2), ("beta".into(), 1)]);
    }
}
