use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use crate::errors::{AppError, Result};
use crate::ui::Theme;

/// Prefix for environment overrides, e.g. `MEDIA_DL_SERVER_URL`.
const ENV_PREFIX: &str = "MEDIA_DL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub default_format: String,
    pub default_theme: Theme,
    pub strict_urls: bool,
    pub proxy: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 500,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            default_format: "best".to_string(),
            default_theme: Theme::Light,
            strict_urls: false,
            proxy: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, writing a default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            AppConfig::default().save_to(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Layers struct defaults, the JSON file at `path` (optional) and `MEDIA_DL_*` env vars.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                std::fs::create_dir_all(config_dir)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config(config::ConfigError::Message("Could not find config directory".to_string())))?;

        Ok(config_dir.join("media-dl-ui").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "server_url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.poll_interval_ms == 0 {
            return Err(AppError::Validation("poll_interval_ms must be greater than zero".to_string()));
        }

        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(AppError::Validation("Timeouts must be greater than zero".to_string()));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
