//! Front-end configuration
//!
//! Settings come from an optional TOML file, then command-line flags
//! override them.
//!
//! ```toml
//! database = "books.xlsx"
//! log_level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "shelfdb.toml";

/// Store file used when neither the config nor the flags name one
pub const DEFAULT_DATABASE: &str = "database.xlsx";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backing `.xlsx` file
    pub database: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DEFAULT_DATABASE),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    /// Load the config file.
    ///
    /// An explicit `path` must exist. Without one, `shelfdb.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}
