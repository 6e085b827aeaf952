//! Symmetry check between the two indexes
//!
//! A mutation that fails between its primary write and its propagation
//! leaves a pair recorded on one side only. [`find`] reports such pairs and
//! [`repair`] restores them by adding the missing side.

use super::error::DbError;
use super::file_index::FileIndex;
use super::tag::TagName;
use super::tag_index::TagIndex;
use super::types::{FileKey, UpdateOp};
use std::collections::BTreeSet;
use std::fmt;
use tracing::info;

/// A file/tag pair recorded in only one index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Inconsistency {
    /// The file record lists the tag, but the tag record lacks the file
    MissingFromTagIndex { key: FileKey, tag: TagName },
    /// The tag record lists the file, but the file record lacks the tag
    MissingFromFileIndex { key: FileKey, tag: TagName },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFromTagIndex { key, tag } => {
                write!(f, "{key} has tag '{tag}', but '{tag}' does not list it")
            }
            Self::MissingFromFileIndex { key, tag } => {
                write!(f, "'{tag}' lists {key}, but {key} does not have the tag")
            }
        }
    }
}

/// Compare both indexes and report every one-sided pair, sorted
///
/// # Errors
///
/// Returns `DbError` if either index cannot be read.
pub fn find(files: &FileIndex<'_>, tags: &TagIndex<'_>) -> Result<Vec<Inconsistency>, DbError> {
    let file_side: BTreeSet<(FileKey, TagName)> = files
        .list()?
        .into_iter()
        .flat_map(|(key, names)| names.into_iter().map(move |tag| (key.clone(), tag)))
        .collect();
    let tag_side: BTreeSet<(FileKey, TagName)> = tags
        .list()?
        .into_iter()
        .flat_map(|(tag, keys)| keys.into_iter().map(move |key| (key, tag.clone())))
        .collect();

    let mut issues: Vec<Inconsistency> = file_side
        .difference(&tag_side)
        .map(|(key, tag)| Inconsistency::MissingFromTagIndex {
            key: key.clone(),
            tag: tag.clone(),
        })
        .chain(tag_side.difference(&file_side).map(|(key, tag)| {
            Inconsistency::MissingFromFileIndex {
                key: key.clone(),
                tag: tag.clone(),
            }
        }))
        .collect();
    issues.sort();
    Ok(issues)
}

/// Add the missing side of each pair, returning how many pairs were written
///
/// # Errors
///
/// Returns `DbError` if an index cannot be rewritten; pairs repaired before
/// the failure stay repaired.
pub fn repair(
    files: &FileIndex<'_>,
    tags: &TagIndex<'_>,
    issues: &[Inconsistency],
) -> Result<usize, DbError> {
    let mut repaired = 0;
    for issue in issues {
        match issue {
            Inconsistency::MissingFromTagIndex { key, tag } => {
                tags.update_files(tag, &BTreeSet::from([key.clone()]), UpdateOp::Add)?;
            }
            Inconsistency::MissingFromFileIndex { key, tag } => {
                files.update_tags(key, &BTreeSet::from([tag.clone()]), UpdateOp::Add)?;
            }
        }
        info!(%issue, "repaired");
        repaired += 1;
    }
    Ok(repaired)
}
