//! Configuration management for taskboard
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::backend::auth::ClientSecrets;
use crate::constants::{
    CONFIG_GENERATED, DEFAULT_AUTH_TIMEOUT_SECS, DEFAULT_INITIAL_SYNC_DELAY_SECS, DEFAULT_POPUP_DURATION_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SYNC_INTERVAL_SECS, MAX_SYNC_INTERVAL_SECS,
};
use crate::ui::theme::ThemeKind;
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub google: GoogleConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay before the first background sync, in seconds
    pub initial_delay_seconds: u64,
    /// Interval between background syncs, in seconds
    pub interval_seconds: u64,
    /// Timeout applied to every remote request, in seconds
    pub request_timeout_seconds: u64,
}

/// Google Tasks client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// OAuth client id (ignored when `credentials_file` is set)
    pub client_id: String,
    /// OAuth client secret (ignored when `credentials_file` is set)
    pub client_secret: String,
    /// Path to the client secrets JSON downloaded from the Google console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
    /// Where the OAuth token is stored (defaults to the config directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
    /// How long the consent flow waits for the browser, in seconds
    pub auth_timeout_seconds: u64,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme: "light" or "dark"
    pub theme: String,
    /// Show task descriptions under their titles
    pub show_descriptions: bool,
    /// How long the completion popup stays up, in milliseconds
    pub popup_duration_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to a file
    pub enabled: bool,
    /// Minimum level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_delay_seconds: DEFAULT_INITIAL_SYNC_DELAY_SECS,
            interval_seconds: DEFAULT_SYNC_INTERVAL_SECS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            credentials_file: None,
            token_file: None,
            auth_timeout_seconds: DEFAULT_AUTH_TIMEOUT_SECS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            show_descriptions: true,
            popup_duration_ms: DEFAULT_POPUP_DURATION_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_seconds)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl GoogleConfig {
    /// Resolve the OAuth client identity, preferring the credentials file.
    ///
    /// Returns `Ok(None)` when nothing is configured; the client then fails
    /// with a configuration error the first time it needs to authorize.
    pub fn client_secrets(&self) -> Result<Option<ClientSecrets>> {
        if let Some(path) = &self.credentials_file {
            let secrets = ClientSecrets::from_file(path)
                .with_context(|| format!("Failed to load credentials file: {}", path.display()))?;
            return Ok(Some(secrets));
        }
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(ClientSecrets::new(self.client_id.trim(), self.client_secret.trim())))
    }

    /// Token file path, defaulting to `<config dir>/taskboard/token.json`.
    pub fn token_path(&self) -> Result<PathBuf> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::get_xdg_config_dir()?.join("token.json")),
        }
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_seconds)
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.level
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid logging level '{}'", self.level))
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("taskboard.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("taskboard").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sync.interval_seconds == 0 {
            anyhow::bail!("interval_seconds must be greater than 0");
        }
        if self.sync.interval_seconds > MAX_SYNC_INTERVAL_SECS {
            anyhow::bail!("interval_seconds cannot exceed {} (24 hours)", MAX_SYNC_INTERVAL_SECS);
        }
        if self.sync.request_timeout_seconds == 0 {
            anyhow::bail!("request_timeout_seconds must be greater than 0");
        }
        if self.google.auth_timeout_seconds == 0 {
            anyhow::bail!("auth_timeout_seconds must be greater than 0");
        }

        if self.ui.theme.parse::<ThemeKind>().is_err() {
            anyhow::bail!("Invalid theme '{}': expected \"light\" or \"dark\"", self.ui.theme);
        }

        self.logging.level_filter()?;

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# taskboard configuration file\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("taskboard"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
