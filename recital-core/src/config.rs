//! recital configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{RecitalError, RecitalResult};

static DEFAULT_API_URL: &str = "http://127.0.0.1:4096";
static DEFAULT_ASSET_DIR: &str = "~/.local/share/recital/assets";
static DEFAULT_DATA_DIR: &str = "~/.local/share/recital/data";
const DEFAULT_MOCK_LATENCY_MS: u64 = 800;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Prefix of environment variables that override the config file.
pub const ENV_PREFIX: &str = "RECITAL";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ASSET_DIR)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_mock_latency_ms() -> u64 {
    DEFAULT_MOCK_LATENCY_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Configuration at ~/.config/recital/config.toml
///
/// Every key can be overridden with a `RECITAL_`-prefixed environment
/// variable, e.g. `RECITAL_USE_MOCK_DATA=true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecitalConfig {
    /// Serve records from built-in sample data instead of the API.
    #[serde(default)]
    pub use_mock_data: bool,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where uploaded images are written when no API is used.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,

    /// Where recital-server keeps its record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_mock_latency_ms")]
    pub mock_latency_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RecitalConfig {
    fn default() -> Self {
        RecitalConfig {
            use_mock_data: false,
            api_url: default_api_url(),
            asset_dir: default_asset_dir(),
            data_dir: default_data_dir(),
            mock_latency_ms: DEFAULT_MOCK_LATENCY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RecitalConfig {
    pub fn config_path() -> RecitalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RecitalError::Config("Could not determine config directory".into()))?
            .join("recital");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented default if it is missing)
    /// and apply environment overrides.
    pub fn load() -> RecitalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path, None)
    }

    /// Load from an explicit file. `env` replaces the process environment
    /// when given.
    pub fn load_from(path: &Path, env: Option<HashMap<String, String>>) -> RecitalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| RecitalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RecitalError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> RecitalResult<()> {
        let contents = format!(
            "\
# recital configuration

# Serve sample records instead of calling the API:
# use_mock_data = false

# Base URL of recital-server:
# api_url = \"{DEFAULT_API_URL}\"

# Where uploaded images are stored locally:
# asset_dir = \"{DEFAULT_ASSET_DIR}\"

# Where recital-server keeps its data:
# data_dir = \"{DEFAULT_DATA_DIR}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RecitalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RecitalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The effective configuration in config file syntax.
    pub fn to_toml(&self) -> RecitalResult<String> {
        toml::to_string_pretty(self).map_err(|e| RecitalError::Serialization(e.to_string()))
    }

    pub fn asset_path(&self) -> PathBuf {
        expand(&self.asset_dir)
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_file_is_missing() {
        let tmp = TempDir::new().unwrap();
        let config = RecitalConfig::load_from(&tmp.path().join("config.toml"), Some(HashMap::new()))
            .expect("Should load");

        assert!(!config.use_mock_data);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.mock_latency(), Duration::from_millis(800));
    }

    #[test]
    fn test_default_file_parses_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("recital/config.toml");
        RecitalConfig::create_default_config(&path).expect("Should write");

        let config = RecitalConfig::load_from(&path, Some(HashMap::new())).expect("Should load");
        assert!(!config.use_mock_data);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_file_values_and_env_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "api_url = \"http://example.test\"\nmock_latency_ms = 0\n").unwrap();

        let env = HashMap::from([("RECITAL_USE_MOCK_DATA".to_string(), "true".to_string())]);
        let config = RecitalConfig::load_from(&path, Some(env)).expect("Should load");

        assert!(config.use_mock_data);
        assert_eq!(config.api_url, "http://example.test");
        assert_eq!(config.mock_latency(), Duration::ZERO);
    }

    #[test]
    fn test_rendered_config_loads_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = RecitalConfig::default();
        config.use_mock_data = true;
        config.request_timeout_secs = 3;
        std::fs::write(&path, config.to_toml().expect("Should render")).unwrap();

        let loaded = RecitalConfig::load_from(&path, Some(HashMap::new())).expect("Should load");
        assert!(loaded.use_mock_data);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(3));
        assert_eq!(loaded.data_dir, config.data_dir);
    }
}
