use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// How snapshots are fetched
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds, `None` to wait indefinitely
    pub timeout_secs: Option<u64>,
    /// Payloads smaller than this are rejected before decoding
    pub min_payload_bytes: usize,
    /// Skip TLS certificate validation (self-signed cameras)
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(30),
            min_payload_bytes: 100,
            accept_invalid_certs: true,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Server settings, usually read from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub fetch: FetchConfig,
    /// Directory for per-run stage snapshots; disabled when unset
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            fetch: FetchConfig::default(),
            snapshot_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load ServerConfig from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load ServerConfig from JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path_ref)?),
            Some("json") => Self::from_json(&fs::read_to_string(path_ref)?),
            _ => Err(ConfigError::UnsupportedFileFormat),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
