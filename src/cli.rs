//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for tagger using the `clap` crate,
//! plus helpers for extracting command-specific data.
//!
//! # Commands
//!
//! - **init**: create a tagged tree
//! - **tag** / **untag**: add or remove tags on one file
//! - **show**: print the tags of files
//! - **files**: print the files carrying a tag
//! - **attach** / **detach**: add or remove files on one tag
//! - **list**: list every tagged file or every tag
//! - **check**: find (and optionally repair) index inconsistencies
//! - **config**: get or set configuration values
//!
//! `tag` and `untag` accept both flag-based (`-f file -t tag1 tag2`) and
//! positional (`file tag1 tag2`) syntax.

use crate::config::PathFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// List variant for the list command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListVariant {
    /// List all tagged files with their tags
    Files,
    /// List all tags with their file counts
    Tags,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tagger")]
#[command(about = "Tag files in a directory tree", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Display absolute paths (overrides config)
    #[arg(long = "absolute", global = true, conflicts_with = "relative")]
    pub absolute: bool,

    /// Display relative paths (overrides config)
    #[arg(long = "relative", global = true, conflicts_with = "absolute")]
    pub relative: bool,

    /// Directory to start the search for the tagged tree from
    #[arg(short = 'C', long = "dir", value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a tagged tree in a directory (default: current directory)
    Init {
        /// Directory to initialize
        #[arg(value_name = "DIR")]
        path: Option<PathBuf>,
    },

    /// Tag a file with one or more tags
    #[command(visible_alias = "t")]
    Tag {
        /// File to tag
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file_flag: Option<PathBuf>,

        /// Tags to apply
        #[arg(short = 't', long = "tags", value_name = "TAG", num_args = 0..)]
        tags_flag: Vec<String>,

        /// File to tag (positional)
        #[arg(value_name = "FILE", conflicts_with = "file_flag")]
        file_pos: Option<PathBuf>,

        /// Tags to apply (positional)
        #[arg(value_name = "TAGS", conflicts_with = "tags_flag")]
        tags_pos: Vec<String>,
    },

    /// Remove tags from a file
    #[command(visible_alias = "u")]
    Untag {
        /// File to untag
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file_flag: Option<PathBuf>,

        /// Tags to remove
        #[arg(short = 't', long = "tags", value_name = "TAG", num_args = 0..)]
        tags_flag: Vec<String>,

        /// File to untag (positional)
        #[arg(value_name = "FILE", conflicts_with = "file_flag")]
        file_pos: Option<PathBuf>,

        /// Tags to remove (positional)
        #[arg(value_name = "TAGS", conflicts_with = "tags_flag")]
        tags_pos: Vec<String>,
    },

    /// Show the tags of one or more files
    Show {
        /// Files to show
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the files carrying a tag
    Files {
        /// Tag to look up
        #[arg(value_name = "TAG")]
        tag: String,
    },

    /// Add one or more files to a tag
    Attach {
        /// Tag to extend
        #[arg(value_name = "TAG")]
        tag: String,

        /// Files to add
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove one or more files from a tag
    Detach {
        /// Tag to shrink
        #[arg(value_name = "TAG")]
        tag: String,

        /// Files to remove
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// List files or tags in the tree
    #[command(visible_alias = "ls")]
    List {
        /// What to list
        #[arg(value_enum, default_value = "files")]
        variant: ListVariant,
    },

    /// Check that both indexes agree
    Check {
        /// Repair inconsistencies by restoring the missing side
        #[arg(long = "repair")]
        repair: bool,

        /// Repair without asking for confirmation
        #[arg(short = 'y', long = "yes", requires = "repair")]
        yes: bool,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., path_format=relative)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., quiet)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the location of the config file
    Path,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path format from the flags, falling back to the configured default
    #[must_use]
    pub const fn path_format(&self, default: PathFormat) -> PathFormat {
        if self.absolute {
            PathFormat::Absolute
        } else if self.relative {
            PathFormat::Relative
        } else {
            default
        }
    }
}

impl Commands {
    /// File argument of `tag`/`untag`, from flag or position
    #[must_use]
    pub fn get_file(&self) -> Option<PathBuf> {
        match self {
            Self::Tag { file_flag, file_pos, .. } | Self::Untag { file_flag, file_pos, .. } => {
                file_flag.clone().or_else(|| file_pos.clone())
            }
            _ => None,
        }
    }

    /// Tag arguments of `tag`/`untag`, from flags or positions
    #[must_use]
    pub fn get_tags(&self) -> Vec<String> {
        match self {
            Self::Tag { tags_flag, tags_pos, .. } | Self::Untag { tags_flag, tags_pos, .. } => {
                if tags_flag.is_empty() {
                    tags_pos.clone()
                } else {
                    tags_flag.clone()
                }
            }
            _ => Vec::new(),
        }
    }
}
