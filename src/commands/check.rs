//! Check command - verify that both indexes agree

use crate::{TaggerError, db::Database};
use colored::Colorize;
use dialoguer::Confirm;

type Result<T> = std::result::Result<T, TaggerError>;

/// Execute the check command
///
/// Lists every file/tag pair recorded on one side only. With `repair`, the
/// missing side is restored after confirmation (skipped by `yes` or `quiet`).
///
/// # Errors
/// Returns an error if the indexes cannot be read or rewritten, or if user
/// interaction fails
pub fn execute(db: &Database, repair: bool, yes: bool, quiet: bool) -> Result<()> {
    if !quiet {
        println!("Checking {}...", db.root().base().display());
    }

    let issues = db.check()?;
    if issues.is_empty() {
        if !quiet {
            println!("No issues found. Indexes are consistent.");
        }
        return Ok(());
    }

    for issue in &issues {
        if quiet {
            println!("{issue}");
        } else {
            println!("  {} {issue}", "!".yellow());
        }
    }

    if !repair {
        if !quiet {
            println!("\nFound {} issue(s). Run with --repair to fix them.", issues.len());
        }
        return Ok(());
    }

    if !(yes || quiet || confirm(&format!("Repair {} issue(s)?", issues.len()))?) {
        println!("Nothing repaired.");
        return Ok(());
    }

    let repaired = db.repair(&issues)?;
    if !quiet {
        println!("Repaired {repaired} issue(s).");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| TaggerError::InvalidInput(format!("Confirmation failed: {e}")))
}
