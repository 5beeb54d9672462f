use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use docqa_engine::{BackendSettings, EngineConfig, DEFAULT_BASE_URL};
use log::LevelFilter;
use serde::Deserialize;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "docqa_client.ron";
const CONFIG_PATH_VAR: &str = "DOCQA_CONFIG";
const BACKEND_URL_VAR: &str = "DOCQA_BACKEND_URL";

/// Client settings read from `docqa_client.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend_url: String,
    pub status_clear_secs: u64,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<u64>,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_string(),
            status_clear_secs: 5,
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_upload_bytes: None,
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn status_clear_after(&self) -> Duration {
        Duration::from_secs(self.status_clear_secs)
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .with_context(|| format!("invalid log_level {:?}", self.log_level))
    }

    pub fn backend_settings(&self) -> Result<BackendSettings> {
        let mut settings = BackendSettings::parse(&self.backend_url)
            .with_context(|| format!("invalid backend_url {:?}", self.backend_url))?;
        settings.connect_timeout = self.connect_timeout_secs.map(Duration::from_secs);
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        Ok(settings)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_upload_bytes: self.max_upload_bytes,
        }
    }

    fn apply_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BACKEND_URL_VAR).filter(|url| !url.trim().is_empty()) {
            self.backend_url = url;
        }
        self
    }
}

/// Loads the config from `$DOCQA_CONFIG` or `./docqa_client.ron`, then applies
/// environment overrides.
pub fn load() -> Result<ClientConfig> {
    let path = std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = load_from(&path)?;
    Ok(config.apply_env_overrides(|key| std::env::var(key).ok()))
}

/// A missing file yields defaults; an unreadable or malformed one is an error.
pub fn load_from(path: &Path) -> Result<ClientConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ClientConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    ron::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}
