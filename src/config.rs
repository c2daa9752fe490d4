use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    BACKEND_URL_ENV, CONFIG_DIR_NAME, DEFAULT_BACKEND_URL, DEFAULT_LOG_FILE,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// User settings loaded from `~/.rtx-preset-installer/config.yaml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Load settings from the default location, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Self::load_from(&config_path())?;
        settings.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
        Ok(settings)
    }

    /// Load settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_backend_override(&mut self, backend_url: Option<String>) {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = url;
        }
    }
}

/// Location of the config file
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("config.yaml")
}
