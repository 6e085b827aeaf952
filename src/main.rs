//! Tagger CLI application entry point
//!
//! This is the main executable for the tagger file tagging system. It parses
//! the command line, loads configuration, sets up logging and dispatches to
//! the command implementations.
//!
//! # Usage
//!
//! ```bash
//! # Start tagging files under the current directory
//! tagger init
//!
//! # Tag a file, then look it up from either side
//! tagger tag notes.txt draft v1
//! tagger show notes.txt
//! tagger files draft
//!
//! # Add several files to one tag at once
//! tagger attach release a.txt b.txt
//!
//! # Verify and repair the indexes
//! tagger check --repair
//! ```
//!
//! # Configuration
//!
//! Configuration is read from the user's config directory
//! (`~/.config/tagger/config.toml` on Linux) and `TAGGER_*` environment
//! variables. Logging honours `RUST_LOG`.

use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use tagger::{
    TaggerError,
    cli::{Cli, Commands, ConfigCommands},
    commands,
    config::TaggerConfig,
    db::{Database, MalformedLinePolicy},
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, TaggerError>;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over the configured filter.
fn init_logging(config: &TaggerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the config subcommands, which never touch a tagged tree
fn handle_config_command(mut config: TaggerConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                TaggerError::InvalidInput("Invalid format. Use: tagger config set key=value".into())
            })?;
            let (key, value) = (key.trim(), value.trim());

            config.set_value(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get_value(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get_value(key)?);
        }
        ConfigCommands::Path => {
            println!("{}", TaggerConfig::config_path()?.display());
        }
    }
    Ok(())
}

/// Open the tagged tree containing `dir`, or the current directory
fn open_tree(dir: Option<&Path>, policy: MalformedLinePolicy) -> Result<Database> {
    let start = dir.unwrap_or_else(|| Path::new("."));
    Ok(Database::open(start)?.with_policy(policy))
}

fn run(cli: Cli, config: TaggerConfig) -> Result<()> {
    let quiet = cli.quiet || config.quiet;
    let path_format = cli.path_format(config.path_format);
    let policy = config.malformed_lines;
    let db = || open_tree(cli.dir.as_deref(), policy);

    match &cli.command {
        Commands::Config { command } => handle_config_command(config, command, quiet),
        Commands::Init { path } => commands::init(path.clone(), quiet),
        Commands::Tag { .. } => {
            commands::tag(&db()?, cli.command.get_file(), &cli.command.get_tags(), quiet)
        }
        Commands::Untag { .. } => {
            commands::tag::untag(&db()?, cli.command.get_file(), &cli.command.get_tags(), quiet)
        }
        Commands::Show { files } => commands::show(&db()?, files, path_format, quiet),
        Commands::Files { tag } => commands::show::files(&db()?, tag, path_format, quiet),
        Commands::Attach { tag, files } => commands::tag::attach(&db()?, tag, files, quiet),
        Commands::Detach { tag, files } => commands::tag::detach(&db()?, tag, files, quiet),
        Commands::List { variant } => commands::list(&db()?, *variant, path_format, quiet),
        Commands::Check { repair, yes } => commands::check(&db()?, *repair, *yes, quiet),
    }
}

/// Main entry point for the tagger application
///
/// Loads configuration, parses command-line arguments, and dispatches to the
/// appropriate command handler. Errors are printed to stderr and turned into
/// a failing exit status.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = match TaggerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), TaggerError::from(e));
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
