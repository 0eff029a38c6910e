use std::collections::BTreeMap;
use std::time::Duration;
use std::{fs, path::PathBuf};

use client::{ApiError, ClientConfig, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "unixfs-rpc";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote node's RPC API
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Timeout for the remote version query, in seconds
    #[serde(default = "default_version_timeout_secs")]
    pub version_timeout_secs: u64,
    /// Extra headers sent with every request (e.g. Authorization)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("hardcoded URL must parse")
}

fn default_version_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            version_timeout_secs: default_version_timeout_secs(),
            headers: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn client_config(&self) -> Result<ClientConfig, ApiError> {
        let mut config = ClientConfig {
            version_timeout: Duration::from_secs(self.version_timeout_secs),
            ..ClientConfig::default()
        };
        for (name, value) in &self.headers {
            config = config.header(name, value)?;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the config directory (~/.unixfs-rpc)
    pub dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the config directory path (custom or default ~/.unixfs-rpc)
    pub fn dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Write a new config file, refusing to overwrite an existing one
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(StateError::AlreadyInitialized(config_path));
        }

        fs::create_dir_all(&dir)?;
        let config = config.unwrap_or_default();
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        Ok(Self {
            dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the config directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("config not initialized. Run 'unixfs init' first")]
    NotInitialized,

    #[error("config already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_url: Url::parse("http://10.0.0.2:5001").unwrap(),
            version_timeout_secs: 5,
            headers: BTreeMap::from([("Authorization".to_string(), "Bearer t".to_string())]),
        };

        let dir = temp.path().to_path_buf();
        let state = AppState::init(Some(dir.clone()), Some(config.clone())).unwrap();
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config, config);

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_load_missing_config() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(temp.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("version_timeout_secs = 2").unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:5001/");
        assert_eq!(config.version_timeout_secs, 2);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_client_config_from_app_config() {
        let mut config = AppConfig::default();
        config
            .headers
            .insert("Authorization".to_string(), "Basic abc".to_string());
        let client_config = config.client_config().unwrap();
        assert_eq!(client_config.version_timeout, Duration::from_secs(30));
        assert_eq!(client_config.headers.get("authorization").unwrap(), "Basic abc");

        config
            .headers
            .insert("bad header".to_string(), "x".to_string());
        assert!(config.client_config().is_err());
    }
}
