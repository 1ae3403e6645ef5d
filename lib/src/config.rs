use crate::error::{Result, TagmarksError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Custom user-agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Owner whose collection the CLI works on
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Timeout for page metadata requests
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Quiet period before a typed URL triggers a metadata fetch
    #[serde(default = "default_autofill_debounce_ms")]
    pub autofill_debounce_ms: u64,

    /// Favicon service URL; `{host}` is replaced with the page hostname
    #[serde(default = "default_favicon_service")]
    pub favicon_service: String,

    /// Database file; defaults to the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            owner: default_owner(),
            metadata_timeout_secs: default_metadata_timeout_secs(),
            autofill_debounce_ms: default_autofill_debounce_ms(),
            favicon_service: default_favicon_service(),
            database: None,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) \
     Version/18.5 Safari/605.1.15"
        .to_string()
}

fn default_owner() -> String {
    "local".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    5
}

fn default_autofill_debounce_ms() -> u64 {
    500
}

fn default_favicon_service() -> String {
    "https://www.google.com/s2/favicons?domain={host}&sz=64".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from default location (~/.config/tagmarks/config.yml)
    /// Falls back to default config if file doesn't exist
    pub fn load() -> Self {
        Self::load_or_default(&Self::default_path())
    }

    /// Like [`Config::load`] for an explicit path
    pub fn load_or_default(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_path(config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}; using default configuration",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn default_path() -> PathBuf {
        crate::utils::get_config_dir().join("config.yml")
    }

    /// Save configuration to a file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::default_path())
    }

    /// Database file, explicit or under the data directory
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| crate::utils::get_default_dbdir().join("bookmarks.db"))
    }

    fn check(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(TagmarksError::Config("owner cannot be empty".to_string()));
        }
        if !self.favicon_service.contains("{host}") {
            return Err(TagmarksError::Config(
                "favicon_service must contain a {host} placeholder".to_string(),
            ));
        }
        Ok(())
    }
}
