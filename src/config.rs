use anyhow::{Context, Result};
use dirs::config_dir;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::syncthing::DEFAULT_URL;

/// Optional configuration file for stfind
///
/// Every value can also be given on the command line, which wins.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Syncthing REST API settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Report output defaults
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Syncthing REST API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Base URL of the Syncthing GUI/API
    #[serde(default = "default_url")]
    pub url: String,

    /// API key shown in the Syncthing GUI
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Report output configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// NUL-terminate records instead of using newlines
    #[serde(default)]
    pub print0: bool,

    /// Keep .stfolder, .stignore and the versions directory in the report
    #[serde(default)]
    pub show_all_config: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "warn"
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or fall back to defaults
    ///
    /// The file is never created; stfind does not write anything.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!("No configuration at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_values()?;

        Ok(config)
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("stfind").join("config.yml"))
    }

    /// Expand environment variables and `~` in the service settings
    pub fn expand_values(&mut self) -> Result<()> {
        self.service.url = shellexpand::full(&self.service.url)
            .context("Failed to expand service.url")?
            .into_owned();

        if let Some(api_key) = self.service.api_key.as_mut() {
            *api_key = shellexpand::full(api_key.as_str())
                .context("Failed to expand service.api_key")?
                .into_owned();
        }

        Ok(())
    }
}
