//! Configuration file for bugdetect.
//!
//! Every field is optional; missing values fall back to built-in defaults
//! and CLI flags override both.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::DEFAULT_MAX_FUNCTION_LINES;
use crate::linter::DEFAULT_LINTER_COMMAND;
use crate::store::DEFAULT_STORE_PATH;

/// File names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["bugdetect.yaml", ".bugdetect.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    /// Where the report history is kept.
    #[serde(default)]
    pub store_path: Option<String>,
    /// Function length, in lines, above which a function is reported.
    #[serde(default)]
    pub long_function_threshold: Option<usize>,
    #[serde(default)]
    pub linter: Option<LinterConfig>,
}

/// External linter settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LinterConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub command: Option<String>,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty file is a valid, all-default configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the first configuration file found in `dir`, if any.
    pub fn discover(dir: &Path) -> anyhow::Result<Option<(PathBuf, Self)>> {
        for name in DEFAULT_CONFIG_NAMES {
            let path = dir.join(name);
            if path.is_file() {
                let config = Self::parse_file(&path)?;
                return Ok(Some((path, config)));
            }
        }
        Ok(None)
    }

    /// Returns the store path (defaults to `reports/bug_reports.json`).
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(self.store_path.as_deref().unwrap_or(DEFAULT_STORE_PATH))
    }

    /// Returns the long-function threshold (defaults to 50).
    pub fn long_function_threshold(&self) -> usize {
        self.long_function_threshold
            .unwrap_or(DEFAULT_MAX_FUNCTION_LINES)
    }

    /// Returns whether the external linter runs by default.
    pub fn linter_enabled(&self) -> bool {
        self.linter.as_ref().map(|l| l.enabled).unwrap_or(false)
    }

    /// Returns the linter executable (defaults to `pylint`).
    pub fn linter_command(&self) -> &str {
        self.linter
            .as_ref()
            .and_then(|l| l.command.as_deref())
            .unwrap_or(DEFAULT_LINTER_COMMAND)
    }
}

/// Validate a configuration.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.long_function_threshold == Some(0) {
        anyhow::bail!("long_function_threshold must be at least 1");
    }

    if let Some(path) = &config.store_path {
        if path.trim().is_empty() {
            anyhow::bail!("store_path must not be empty");
        }
    }

    if let Some(linter) = &config.linter {
        if let Some(command) = &linter.command {
            if command.trim().is_empty() {
                anyhow::bail!("linter.command must not be empty");
            }
        }
    }

    Ok(())
}
