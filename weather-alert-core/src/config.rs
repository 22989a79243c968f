use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::catalog::Catalog;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_base_url = "http://127.0.0.1:5000"
/// request_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Origin serving `/api/weather` and `/api/forecast`.
    pub api_base_url: String,

    /// Per-request timeout. Absent means the HTTP client's default.
    pub request_timeout_secs: Option<u64>,

    /// JSON file replacing the built-in city catalog.
    pub catalog_path: Option<PathBuf>,

    /// Where recent searches are kept. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            catalog_path: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return the default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-alert", "weather-alert")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding persisted client state.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Catalog {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Catalog::popular(),
        }
    }

    /// Validate and store a new API base URL.
    pub fn set_api_base_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(
                "Invalid API base URL '{url}'.\n\
                 Hint: it must start with http:// or https://, e.g. {DEFAULT_API_BASE_URL}"
            ));
        }

        self.api_base_url = url.trim_end_matches('/').to_string();
        Ok(())
    }
}
