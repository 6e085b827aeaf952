//! Show and files commands - query one side of the index

use crate::{TaggerError, config::PathFormat, db::Database, output};
use std::path::PathBuf;

type Result<T> = std::result::Result<T, TaggerError>;

/// Execute the show command - print the tags of each file
///
/// # Errors
/// Returns an error if a file is outside the tree or the index cannot be read
pub fn execute(db: &Database, files: &[PathBuf], path_format: PathFormat, quiet: bool) -> Result<()> {
    for file in files {
        let key = db.root().normalize(file)?;
        let tags = db.file_get_tags(file)?;
        let path = db.root().resolve(&key);
        println!("{}", output::file_line(&path, &tags, path_format, quiet));
    }
    Ok(())
}

/// Execute the files command - print the files carrying a tag
///
/// # Errors
/// Returns an error if the tag is invalid or the index cannot be read
pub fn files(db: &Database, tag: &str, path_format: PathFormat, quiet: bool) -> Result<()> {
    let keys = db.tag_get_files(tag)?;

    if keys.is_empty() {
        if !quiet {
            println!("No files tagged '{}'.", tag.trim());
        }
        return Ok(());
    }

    for key in keys {
        let path = db.root().resolve(&key);
        if quiet {
            println!("{}", output::display_path(&path, path_format));
        } else {
            println!("  {}", output::member_path(&path, path_format));
        }
    }
    Ok(())
}
