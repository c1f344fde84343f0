//! Configuration loader. The optional JSON file can replace the default key
//! matrix and set the log filter; a SHA-256 fingerprint of the raw file is
//! kept so the session log can identify the key without printing it.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::crypto::integrity::sha256_hex;
use crate::crypto::{CipherError, HillCipher};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("invalid key matrix: {0}")]
    Cipher(#[from] CipherError),
}

#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    /// Row-major 2x2 key, e.g. `[[5, 4], [21, 25]]`.
    #[serde(rename = "keyMatrix")]
    pub key_matrix: Option<[[i64; 2]; 2]>,
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(rename = "logFilter")]
    pub log_filter: Option<String>,
}

#[derive(Debug, Default)]
pub struct RuntimeConfig {
    pub cipher: HillCipher,
    pub log_filter: Option<String>,
    /// Hex SHA-256 of the config file, when one was loaded.
    pub fingerprint: Option<String>,
}

impl RuntimeConfig {
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let cipher = match raw.key_matrix {
            Some(rows) => HillCipher::from_rows(rows)?,
            None => HillCipher::default(),
        };
        Ok(Self {
            cipher,
            log_filter: raw.log_filter,
            fingerprint: None,
        })
    }
}

/// Reads and validates the JSON configuration file. A key matrix that is not
/// invertible modulo 26 is rejected here, before any session starts.
pub fn load_config(path: impl AsRef<Path>) -> Result<RuntimeConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let raw_config: RawConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;

    let mut config = RuntimeConfig::from_raw(raw_config)?;
    config.fingerprint = Some(sha256_hex(raw_json.as_bytes()));
    Ok(config)
}
