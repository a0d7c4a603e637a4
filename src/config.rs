//! Configuration module
//!
//! Reads an optional TOML file (~/.config/hash-probe/config.toml by
//! default). Every section falls back to the built-in probe defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::hash_format::SchemeVersion;
use crate::error::ConfigError;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "HASH_PROBE_CONFIG";

pub const DEFAULT_PASSWORD: &str = "Al3m4nJ=";
pub const DEFAULT_STORED_HASH: &str =
    "$2b$12$7VaGuZHCp6JnCKeSSMY7PuYDkGy5Laq28WVTN8R1p5xRQYyP1YuhO";
pub const DEFAULT_SAMPLE_PASSWORD: &str = "test123";

/// Path of the config file when no override is given.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hash-probe")
        .join("config.toml")
}

/// Config path from `HASH_PROBE_CONFIG`, or the default location.
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub hashing: HashingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Hash generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// bcrypt cost factor (log2 rounds)
    pub cost: u32,
    /// Version tag for newly generated hashes
    pub version: String,
    /// Refuse passwords longer than 72 bytes instead of truncating
    pub reject_truncation: bool,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
            version: SchemeVersion::default().to_string(),
            reject_truncation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "plain" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "plain".to_string(),
        }
    }
}

/// Inputs of the two-step probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub password: String,
    pub stored_hash: String,
    pub sample_password: String,
    /// Characters of the generated hash shown in the report
    pub preview_len: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            stored_hash: DEFAULT_STORED_HASH.to_string(),
            sample_password: DEFAULT_SAMPLE_PASSWORD.to_string(),
            preview_len: 30,
        }
    }
}
