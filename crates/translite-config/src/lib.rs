use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::network::NetworkConfig;
use self::translator::TranslatorConfig;

pub mod network;
pub mod translator;

pub const CONFIG_FILE_NAME: &str = "translator_config.json";
pub const CONFIG_PATH_ENV: &str = "TRANSLITE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Flat JSON document, every key optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub network: NetworkConfig,
    #[serde(flatten)]
    pub translator: TranslatorConfig,
    /// Log at debug level unless RUST_LOG says otherwise
    pub enable_debug_output: bool,
}

impl Config {
    /// Load configuration, falling back to built-in defaults on any failure.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

        let mut config = match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                Self::default()
            }
        };

        config.network.apply_env();
        config.normalize();
        config
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        self.network.normalize();
        self.translator.normalize();
    }
}

/// `TRANSLITE_CONFIG`, then next to the executable, then the working directory
pub fn default_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    if let Ok(exe) = env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(CONFIG_FILE_NAME)
}
