use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::provider::weatherapi::DEFAULT_BASE_URL;

pub const DEFAULT_DIRECTORY_URL: &str = "https://data.gov.il/api/3/action/datastore_search";
pub const DEFAULT_DIRECTORY_RESOURCE_ID: &str = "8f714b6f-c35c-4b40-a0e7-547b675eee0e";
pub const DEFAULT_DIRECTORY_LIMIT: u32 = 10_000;
pub const HISTORY_FILE_NAME: &str = "weather_history.json";

/// Credentials and endpoint for WeatherAPI.com.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string() }
    }
}

/// Where the settlement list is downloaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub url: String,
    pub resource_id: String,
    pub limit: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DIRECTORY_URL.to_string(),
            resource_id: DEFAULT_DIRECTORY_RESOURCE_ID.to_string(),
            limit: DEFAULT_DIRECTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryConfig {
    /// Overrides the platform data directory location.
    pub path: Option<PathBuf>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [weatherapi]
/// api_key = "..."
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weatherapi: WeatherApiConfig,
    pub directory: DirectoryConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "il-weather", "il-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted search history.
    pub fn history_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.history.path {
            return Ok(path.clone());
        }
        Ok(Self::project_dirs()?.data_dir().join(HISTORY_FILE_NAME))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.weatherapi.api_key = Some(api_key);
    }

    /// Returns the WeatherAPI.com key, ignoring a blank value.
    pub fn api_key(&self) -> Option<&str> {
        self.weatherapi.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}
