//! Tag, untag, attach and detach commands

use crate::{TaggerError, db::Database};
use std::path::PathBuf;

type Result<T> = std::result::Result<T, TaggerError>;

/// Execute the tag command - add tags to a file
///
/// # Errors
/// Returns an error if arguments are missing, a tag is invalid, the file is
/// outside the tree, or the indexes cannot be updated
pub fn execute(db: &Database, file: Option<PathBuf>, tags: &[String], quiet: bool) -> Result<()> {
    let file_path = file.ok_or_else(|| TaggerError::InvalidInput("No file provided".into()))?;
    if tags.is_empty() {
        return Err(TaggerError::InvalidInput("No tags provided".into()));
    }

    db.file_add_tags(&file_path, tags)?;
    if !quiet {
        println!("Tagged {} with: {}", file_path.display(), tags.join(", "));
    }
    Ok(())
}

/// Execute the untag command - remove tags from a file
///
/// # Errors
/// Returns an error if arguments are missing, a tag is invalid, the file is
/// outside the tree, or the indexes cannot be updated
pub fn untag(db: &Database, file: Option<PathBuf>, tags: &[String], quiet: bool) -> Result<()> {
    let file_path = file.ok_or_else(|| TaggerError::InvalidInput("No file provided".into()))?;
    if tags.is_empty() {
        return Err(TaggerError::InvalidInput("No tags provided".into()));
    }

    db.file_remove_tags(&file_path, tags)?;
    if !quiet {
        println!("Removed tags {} from {}", tags.join(", "), file_path.display());
    }
    Ok(())
}

/// Execute the attach command - add files to a tag
///
/// # Errors
/// Returns an error if the tag is invalid, a file is outside the tree, or
/// the indexes cannot be updated
pub fn attach(db: &Database, tag: &str, files: &[PathBuf], quiet: bool) -> Result<()> {
    db.tag_add_files(tag, files)?;
    if !quiet {
        println!("Attached {} file(s) to '{}'", files.len(), tag.trim());
    }
    Ok(())
}

/// Execute the detach command - remove files from a tag
///
/// # Errors
/// Returns an error if the tag is invalid, a file is outside the tree, or
/// the indexes cannot be updated
pub fn detach(db: &Database, tag: &str, files: &[PathBuf], quiet: bool) -> Result<()> {
    db.tag_remove_files(tag, files)?;
    if !quiet {
        println!("Detached {} file(s) from '{}'", files.len(), tag.trim());
    }
    Ok(())
}
