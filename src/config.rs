//! Configuration management
//!
//! Handles TOML configuration parsing and validation. Every key is optional;
//! missing keys fall back to the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};
use crate::filters::validate_essid_filters;
use crate::parser::ParseOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub parser: ParserSettings,
    pub output: OutputSettings,
}

/// Document acceptance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Only accept files with a `.netxml` extension
    pub require_extension: bool,
}

/// Listing settings for the command-line tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Emit JSON instead of human-readable text
    pub json: bool,
    /// List clients under their networks
    pub include_clients: bool,
    /// ESSID filters (exact or glob); empty lists every network
    pub essid_filters: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            require_extension: true,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json: false,
            include_clients: true,
            essid_filters: Vec::new(),
        }
    }
}

impl Configuration {
    /// Load and validate a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Configuration = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/netxml/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load `path` if given, else the default file if it exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load_from_file(&default),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_essid_filters(&self.output.essid_filters)
            .context("Invalid essid_filters in configuration")
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            require_extension: self.parser.require_extension,
        }
    }
}
