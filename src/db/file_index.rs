//! File → tags index
//!
//! Records live in bucket files under `files/`, one bucket per shard of the
//! file key's digest. A bucket holds one line per file:
//!
//! ```text
//! <file_key>\0<tag1>,<tag2>,...\n
//! ```
//!
//! Every update reads the whole bucket, changes one record and rewrites the
//! bucket with records sorted by key. Records left without tags are dropped.

use super::error::DbError;
use super::record::{self, MalformedLines, RawLine};
use super::root::Root;
use super::shard;
use super::tag::TagName;
use super::types::{FileKey, MalformedLinePolicy, UpdateOp};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const KEY_SEPARATOR: u8 = b'\0';
const TAG_SEPARATOR: char = ',';

/// Parsed contents of one bucket file
struct Bucket {
    records: BTreeMap<FileKey, BTreeSet<TagName>>,
    malformed: MalformedLines,
}

impl Bucket {
    fn load(path: &Path, policy: MalformedLinePolicy) -> Result<Self, DbError> {
        let mut records: BTreeMap<FileKey, BTreeSet<TagName>> = BTreeMap::new();
        let mut malformed = MalformedLines::new(path, policy);

        for line in record::read_lines(path)? {
            let Some((key, raw_tags)) = split_line(&line) else {
                malformed.report(line)?;
                continue;
            };

            let tags = records.entry(FileKey::from_record(key)).or_default();
            for raw in raw_tags
                .split(TAG_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
            {
                match TagName::parse(raw) {
                    Ok(tag) => {
                        tags.insert(tag);
                    }
                    Err(_) => warn!(
                        path = %path.display(),
                        line = line.number,
                        tag = raw,
                        "dropping invalid tag from file record"
                    ),
                }
            }
        }
        Ok(Self { records, malformed })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (key, tags) in &self.records {
            if tags.is_empty() {
                continue;
            }
            let joined: Vec<&str> = tags.iter().map(|t| &**t).collect();
            body.extend_from_slice(key.as_bytes());
            body.push(KEY_SEPARATOR);
            body.extend_from_slice(joined.join(",").as_bytes());
            body.push(b'\n');
        }
        self.malformed.append_to(&mut body);
        body
    }
}

/// Split `<key>\0<tags>`; `None` if the line does not have that shape
fn split_line(line: &RawLine) -> Option<(&str, &str)> {
    let text = std::str::from_utf8(&line.bytes).ok()?;
    let (key, tags) = text.split_once(char::from(KEY_SEPARATOR))?;
    (!key.is_empty()).then_some((key, tags))
}

/// Access to the file → tags side of a tagged tree
pub struct FileIndex<'a> {
    root: &'a Root,
    policy: MalformedLinePolicy,
}

impl<'a> FileIndex<'a> {
    #[must_use]
    pub const fn new(root: &'a Root, policy: MalformedLinePolicy) -> Self {
        Self { root, policy }
    }

    fn bucket_path(&self, key: &FileKey) -> PathBuf {
        self.root.files_dir().join(shard::file_shard(key))
    }

    /// Sorted tags of `key`; empty if the file has no record
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the bucket cannot be read, or holds a malformed
    /// line under the strict policy.
    pub fn get_tags(&self, key: &FileKey) -> Result<Vec<TagName>, DbError> {
        let bucket = Bucket::load(&self.bucket_path(key), self.policy)?;
        Ok(bucket
            .records
            .get(key)
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Add or remove `tags` on `key`'s record
    ///
    /// Returns `false` without writing anything if the tag set is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the bucket cannot be read or rewritten.
    pub fn update_tags(
        &self,
        key: &FileKey,
        tags: &BTreeSet<TagName>,
        op: UpdateOp,
    ) -> Result<bool, DbError> {
        let path = self.bucket_path(key);
        let mut bucket = Bucket::load(&path, self.policy)?;

        let current = bucket.records.get(key).cloned().unwrap_or_default();
        let updated = op.apply(&current, tags);
        if updated == current {
            debug!(key = %key, ?op, "file record unchanged");
            return Ok(false);
        }

        bucket.records.insert(key.clone(), updated);
        record::rewrite(&path, &bucket.serialize())?;
        debug!(key = %key, ?op, bucket = %path.display(), "updated file record");
        Ok(true)
    }

    /// Every file record in the tree, sorted by key
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the bucket directory or a bucket cannot be read.
    pub fn list(&self) -> Result<Vec<(FileKey, Vec<TagName>)>, DbError> {
        let dir = self.root.files_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DbError::io(&dir, e)),
        };

        let mut all: BTreeMap<FileKey, Vec<TagName>> = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| DbError::io(&dir, e))?;
            let path = entry.path();
            let is_bucket = entry.file_name().to_str().is_some_and(shard::is_shard_name)
                && path.is_file();
            if !is_bucket {
                debug!(path = %path.display(), "skipping non-bucket entry");
                continue;
            }

            let bucket = Bucket::load(&path, self.policy)?;
            for (key, tags) in bucket.records {
                if !tags.is_empty() {
                    all.insert(key, tags.into_iter().collect());
                }
            }
        }
        Ok(all.into_iter().collect())
    }
}
