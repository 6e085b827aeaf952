//! Init command - create a tagged tree

use crate::{TaggerError, db::Database};
use std::path::PathBuf;

type Result<T> = std::result::Result<T, TaggerError>;

/// Execute the init command
///
/// # Errors
/// Returns an error if the directory is already a tagged tree or the
/// metadata directories cannot be created
pub fn execute(path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let base = path.unwrap_or_else(|| PathBuf::from("."));
    let db = Database::initialize(&base)?;
    if !quiet {
        println!("Initialized tagged tree in {}", db.root().base().display());
    }
    Ok(())
}
