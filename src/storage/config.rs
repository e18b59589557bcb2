//! Configuration handling for career-span
//!
//! Configuration is read from the first of:
//! 1. the path given with `--config`
//! 2. `career-span.toml` in the current directory
//! 3. `~/.config/career-span/config.toml` (platform equivalent)
//!
//! Missing files fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "career-span.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
}

/// Output format for commands
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Zero-based column positions in an imported sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: usize,
    pub start_month: usize,
    pub end_month: usize,
    pub role: usize,
    pub client: usize,
    pub skills: usize,
    pub employment_type: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        // Column 3 holds the computed duration and is never read
        Self {
            name: 0,
            start_month: 1,
            end_month: 2,
            role: 4,
            client: 5,
            skills: 6,
            employment_type: 7,
        }
    }
}

/// Settings for reading engagement sheets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Cell text identifying the header row
    pub header_marker: String,

    /// A name cell containing any of these ends the data section
    pub stop_markers: Vec<String>,

    pub columns: ColumnMap,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_marker: "사업명".to_string(),
            stop_markers: vec!["사용법:".to_string()],
            columns: ColumnMap::default(),
        }
    }
}

/// Settings for writing result files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Append the overlap ranges after the summary block
    pub include_ranges: bool,
}

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    pub import: ImportConfig,

    pub export: ExportConfig,
}

impl Settings {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.import.header_marker.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "import.header_marker must not be empty".to_string(),
            ));
        }
        if self.import.stop_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "import.stop_markers must not contain blank entries".to_string(),
            ));
        }

        let c = &self.import.columns;
        let mut used = [
            c.name,
            c.start_month,
            c.end_month,
            c.role,
            c.client,
            c.skills,
            c.employment_type,
        ];
        used.sort_unstable();
        if used.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid(
                "import.columns must map each field to a distinct column".to_string(),
            ));
        }

        Ok(self)
    }
}

/// Loaded configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration, preferring `explicit` when given
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            return Self::from_file(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(&local);
        }

        match Self::global_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads and validates a single TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let settings = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;

        Ok(Self {
            settings,
            source: Some(path.to_path_buf()),
        })
    }

    /// Parses settings from TOML text
    pub fn parse(content: &str) -> Result<Settings, ConfigError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "career-span", "career-span")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Renders the effective settings as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.settings).context("Failed to serialize config")
    }
}
