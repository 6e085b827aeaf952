//! Terminal rendering of tagged paths and tag counts

use crate::config::PathFormat;
use crate::db::TagName;
use colored::Colorize;
use std::borrow::Cow;
use std::env;
use std::path::Path;

/// Render `path` in the requested format
///
/// Relative output is taken against the current directory. Paths outside it
/// are shown absolute.
#[must_use]
pub fn display_path(path: &Path, format: PathFormat) -> Cow<'_, str> {
    let shown = match format {
        PathFormat::Absolute => path,
        PathFormat::Relative => env::current_dir()
            .ok()
            .and_then(|cwd| path.strip_prefix(cwd).ok())
            .map(|rel| if rel.as_os_str().is_empty() { Path::new(".") } else { rel })
            .unwrap_or(path),
    };
    shown.to_string_lossy()
}

/// Comma-separated tag names
#[must_use]
pub fn tag_list(tags: &[TagName]) -> String {
    tags.iter().map(|t| &**t).collect::<Vec<_>>().join(", ")
}

/// One line of `show` / `list files` output
#[must_use]
pub fn file_line(path: &Path, tags: &[TagName], format: PathFormat, quiet: bool) -> String {
    let shown = display_path(path, format);
    if quiet {
        return shown.into_owned();
    }

    let tags = if tags.is_empty() {
        "(untagged)".dimmed().to_string()
    } else {
        tag_list(tags).cyan().to_string()
    };
    format!("  {shown}: {tags}")
}

/// One line of `list tags` output
#[must_use]
pub fn tag_line(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        return tag.to_string();
    }
    let noun = if count == 1 { "file" } else { "files" };
    format!("  {tag:<24} {count} {noun}")
}

/// A tag member path, flagged when the file no longer exists on disk
#[must_use]
pub fn member_path(path: &Path, format: PathFormat) -> String {
    let shown = display_path(path, format);
    if path.exists() {
        shown.green().to_string()
    } else {
        format!("{} {}", shown.red(), "(missing)".dimmed())
    }
}
