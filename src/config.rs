use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::bridge::PlacementType;
use crate::transport::{UrlSchemeCodec, UrlSchemeError, DEFAULT_SCHEME};

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "MRAID_BRIDGE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read bridge config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid command scheme: {0}")]
    InvalidScheme(#[from] UrlSchemeError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default)]
    placement_type: Option<PlacementType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub codec: UrlSchemeCodec,
    pub placement_type: PlacementType,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            codec: UrlSchemeCodec::default(),
            placement_type: PlacementType::Inline,
        }
    }
}

impl BridgeConfig {
    /// Load from `config_path`, falling back to defaults when no path is
    /// given or the file does not exist.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let raw = match config_path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)?;
                serde_yaml::from_str::<RawConfig>(&contents)?
            }
            _ => RawConfig {
                scheme: None,
                placement_type: None,
            },
        };

        let scheme = raw.scheme.unwrap_or_else(|| DEFAULT_SCHEME.to_string());
        Ok(Self {
            codec: UrlSchemeCodec::new(scheme)?,
            placement_type: raw.placement_type.unwrap_or_default(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }
}
