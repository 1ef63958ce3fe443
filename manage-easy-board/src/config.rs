//! Configuration loading using Figment
//!
//! Sources are merged in precedence order, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Global file: `~/.manage-easy/config.{toml,yaml,yml,json}`
//! 3. Project file: `./.manage-easy/config.{toml,yaml,yml,json}`
//! 4. An explicit file passed with [`ConfigProvider::with_file`]
//! 5. Environment variables prefixed `MANAGE_EASY_`, with `__` separating
//!    nested keys (`MANAGE_EASY_STORE__BASE_URL`)

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Directory name searched for config files, both globally and per project
pub const CONFIG_DIR_NAME: &str = ".manage-easy";
/// Config file stem inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_STEM: &str = "config";
/// Environment variable prefix
pub const ENV_PREFIX: &str = "MANAGE_EASY_";

const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError { source: Box<figment::Error> },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ValidationError { message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub layout: LayoutConfig,
}

impl AppConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("store.base_url", "must not be empty"));
        }
        if !self.store.base_url.starts_with("http://") && !self.store.base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "store.base_url '{}' is not an http(s) URL",
                    self.store.base_url
                ),
            });
        }
        if self.store.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "store.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.layout.card_height.is_nan() || self.layout.card_height <= 0.0 {
            return Err(ConfigError::invalid(
                "layout.card_height",
                "must be greater than zero",
            ));
        }
        if self.layout.card_gap.is_nan() || self.layout.card_gap < 0.0 {
            return Err(ConfigError::invalid(
                "layout.card_gap",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Where and how to reach the Cloud Functions backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL the function names are appended to
    pub base_url: String,
    pub timeout_secs: u64,
    /// Bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001/manage-easy/us-central1".to_string(),
            timeout_secs: 30,
            token: None,
        }
    }
}

/// Card metrics used to turn a pointer offset into a lane index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub card_height: f64,
    pub card_gap: f64,
    /// Space between the lane's top edge and its first card
    pub padding_top: f64,
}

impl LayoutConfig {
    /// Vertical distance from one card's top to the next
    pub fn card_stride(&self) -> f64 {
        self.card_height + self.card_gap
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_height: 88.0,
            card_gap: 8.0,
            padding_top: 0.0,
        }
    }
}

/// Configuration provider using figment
///
/// No caching is performed; each call to [`ConfigProvider::load`] reads the
/// sources again.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    home_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    explicit_file: Option<PathBuf>,
}

impl ConfigProvider {
    /// Create a provider that searches the user's home and the current directory
    pub fn new() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            project_dir: std::env::current_dir().ok(),
            explicit_file: None,
        }
    }

    /// Override the directory searched for the global config
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Override the directory searched for the project config
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    /// Merge one more file after the discovered ones
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Load and validate the configuration
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let config: AppConfig = self.build_figment().extract()?;
        config.validate()?;
        debug!(base_url = %config.store.base_url, "loaded configuration");
        Ok(config)
    }

    /// Build the figment with all sources in precedence order
    fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for dir in [&self.home_dir, &self.project_dir].into_iter().flatten() {
            if let Some(file) = discover(dir) {
                trace!("Loading config file: {}", file.display());
                figment = figment.merge(file_provider(&file));
            }
        }

        if let Some(ref file) = self.explicit_file {
            trace!("Loading explicit config file: {}", file.display());
            figment = figment.merge(file_provider(file));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the first config file under `<dir>/.manage-easy/`
fn discover(dir: &Path) -> Option<PathBuf> {
    let config_dir = dir.join(CONFIG_DIR_NAME);
    EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext)))
        .find(|p| p.is_file())
}

fn file_provider(path: &Path) -> Figment {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Figment::from(Yaml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => Figment::from(Toml::file(path)),
    }
}
