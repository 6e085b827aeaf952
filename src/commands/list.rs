//! List command - list files or tags in the tree

use crate::{TaggerError, cli::ListVariant, config, db::Database, output};

type Result<T> = std::result::Result<T, TaggerError>;

/// Execute the list command
///
/// # Errors
/// Returns an error if the index cannot be read
pub fn execute(
    db: &Database,
    variant: ListVariant,
    path_format: config::PathFormat,
    quiet: bool,
) -> Result<()> {
    match variant {
        ListVariant::Files => list_files(db, path_format, quiet),
        ListVariant::Tags => list_tags(db, quiet),
    }
}

fn list_files(db: &Database, path_format: config::PathFormat, quiet: bool) -> Result<()> {
    let records = db.list_files()?;

    if records.is_empty() {
        if !quiet {
            println!("No tagged files.");
        }
    } else {
        if !quiet {
            println!("Tagged files:");
        }
        for (key, tags) in records {
            let path = db.root().resolve(&key);
            println!("{}", output::file_line(&path, &tags, path_format, quiet));
        }
    }
    Ok(())
}

fn list_tags(db: &Database, quiet: bool) -> Result<()> {
    let tags = db.list_tags()?;

    if tags.is_empty() {
        if !quiet {
            println!("No tags found.");
        }
    } else {
        if !quiet {
            println!("Tags:");
        }
        for (tag, count) in tags {
            println!("{}", output::tag_line(&tag, count, quiet));
        }
    }
    Ok(())
}
