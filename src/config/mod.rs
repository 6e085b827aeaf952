//! Configuration module for tagger
//!
//! Manages user preferences for the command-line tool. Configuration is read
//! from `config.toml` in the user's config directory and can be overridden by
//! `TAGGER_*` environment variables (e.g. `TAGGER_QUIET=true`).
//!
//! A missing file means defaults; loading never writes anything.

use crate::db::MalformedLinePolicy;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "TAGGER";

/// Keys accepted by [`TaggerConfig::set_value`] and [`TaggerConfig::get_value`]
pub const KEYS: &[&str] = &["quiet", "path_format", "malformed_lines", "log_filter"];

/// Path display format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PathFormat {
    /// Display absolute paths
    #[default]
    Absolute,
    /// Display relative paths (relative to current directory)
    Relative,
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct TaggerConfig {
    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Default format for displaying paths (absolute or relative)
    #[serde(default)]
    pub path_format: PathFormat,

    /// What index rewrites do with lines they cannot parse
    #[serde(default)]
    pub malformed_lines: MalformedLinePolicy,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl TaggerConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("tagger").join("config.toml"))
    }

    /// Load configuration from the user's config file and environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, overlaid by the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed, or a
    /// value has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the user's config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined or
    /// the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Set a single value from its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or a value that does not parse.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "quiet" => {
                self.quiet = value.parse::<bool>().map_err(|_| {
                    ConfigError::Message(format!(
                        "Invalid value for quiet: '{value}'. Use 'true' or 'false'"
                    ))
                })?;
            }
            "path_format" => self.path_format = parse_enum(key, value)?,
            "malformed_lines" => self.malformed_lines = parse_enum(key, value)?,
            "log_filter" => {
                self.log_filter = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Get a single value in its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "quiet" => Ok(self.quiet.to_string()),
            "path_format" => Ok(enum_name(&self.path_format)),
            "malformed_lines" => Ok(enum_name(&self.malformed_lines)),
            "log_filter" => Ok(self.log_filter.clone().unwrap_or_default()),
            _ => Err(unknown_key(key)),
        }
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Message(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        KEYS.join(", ")
    ))
}

/// Parse a lowercase enum value through its serde representation
fn parse_enum<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T, ConfigError> {
    #[derive(Deserialize)]
    struct Wrapper<T> {
        value: T,
    }
    let quoted = format!("value = {}", toml::Value::String(value.to_string()));
    toml::from_str::<Wrapper<T>>(&quoted)
        .map(|w| w.value)
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}'")))
}

fn enum_name<T: Serialize>(value: &T) -> String {
    toml::Value::try_from(value)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}
