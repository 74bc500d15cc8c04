//! Rule configuration loading.
//!
//! Rules come either from the built-in table or from a file whose extension
//! selects the parser:
//!
//! - `.json` (serde_json)
//! - `.yaml` / `.yml` (serde_yaml)
//! - `.toml` (toml)
//!
//! Every format describes the same thing, a map of category names to
//! extension lists, in the order the categories should be tried:
//!
//! ```toml
//! Documents = ["pdf", "docx"]
//! Images = ["jpg", "jpeg"]
//! ```

use crate::rules::{RuleError, RuleSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(
        "Unsupported configuration file format: {}. Use .json, .yaml, .yml or .toml",
        .0.display()
    )]
    UnsupportedFormat(PathBuf),

    #[error("Error reading configuration from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading configuration from {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] RuleError),
}

/// A parser for one configuration file format.
pub trait ConfigLoader {
    /// Human-readable format name, used in logs.
    fn format_name(&self) -> &'static str;

    /// Parses file contents into a rule set. The returned error string is
    /// wrapped into [`ConfigError::Parse`] by the caller.
    fn parse(&self, text: &str) -> Result<RuleSet, String>;
}

pub struct JsonLoader;

impl ConfigLoader for JsonLoader {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, text: &str) -> Result<RuleSet, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}

pub struct YamlLoader;

impl ConfigLoader for YamlLoader {
    fn format_name(&self) -> &'static str {
        "YAML"
    }

    fn parse(&self, text: &str) -> Result<RuleSet, String> {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }
}

pub struct TomlLoader;

impl ConfigLoader for TomlLoader {
    fn format_name(&self) -> &'static str {
        "TOML"
    }

    fn parse(&self, text: &str) -> Result<RuleSet, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

/// Picks a loader from the file extension (case-insensitive).
pub fn loader_for(path: &Path) -> Result<Box<dyn ConfigLoader>, ConfigError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => Ok(Box::new(JsonLoader)),
        "yaml" | "yml" => Ok(Box::new(YamlLoader)),
        "toml" => Ok(Box::new(TomlLoader)),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Loads the rule set to organize with.
///
/// With no path the built-in table is returned. An explicit path must exist,
/// have a supported extension, parse, and name only usable categories.
pub fn load_rules(config_path: Option<&Path>) -> Result<RuleSet, ConfigError> {
    match config_path {
        Some(path) => load_from_file(path),
        None => Ok(RuleSet::default()),
    }
}

fn load_from_file(path: &Path) -> Result<RuleSet, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let loader = loader_for(path)?;

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rules = loader
        .parse(&content)
        .map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;
    rules.validate()?;

    tracing::debug!(
        "Loaded {} categories from {} configuration {}",
        rules.len(),
        loader.format_name(),
        path.display()
    );
    Ok(rules)
}
