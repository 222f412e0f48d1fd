//! Runtime settings read from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("configuration error for {field}: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listen port (`PORT`, default 8080)
    pub port: u16,
    /// Directory holding the persisted key-value files (`APP_DATA_DIR`)
    pub data_dir: PathBuf,
    /// How long a banner message stays visible (`MESSAGE_TIMEOUT_MS`)
    pub message_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank variables fall back to
    /// defaults; malformed numbers are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match read("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|err| ConfigError {
                field: "PORT",
                message: format!("invalid port '{raw}': {err}"),
            })?,
            None => DEFAULT_PORT,
        };

        let data_dir = read("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let timeout_ms = match read("MESSAGE_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|err| ConfigError {
                field: "MESSAGE_TIMEOUT_MS",
                message: format!("invalid duration '{raw}': {err}"),
            })?,
            None => DEFAULT_MESSAGE_TIMEOUT_MS,
        };

        Ok(Self {
            port,
            data_dir,
            message_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
