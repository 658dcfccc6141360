//! Process configuration, read from the environment once at startup.

use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `host:port` the server binds to.
    pub bind_addr: String,
    /// SQLite database file. Created on first start if absent.
    pub db_path: PathBuf,
    pub platform: Platform,
    /// Directory served under `/app`.
    pub static_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Which environment the process runs in. The destructive admin endpoints
/// only work on [`Platform::Dev`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Dev,
    Production,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Dev => "dev",
            Platform::Production => "production",
        })
    }
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// Required: `DB_PATH` (SQLite database file) and `PLATFORM` (`dev`
    /// unlocks the destructive admin endpoints; anything else is production).
    /// Optional: `BIND_ADDR` (default `0.0.0.0:8080`) and `STATIC_DIR`
    /// (default `.`, the directory served under `/app`).
    ///
    /// An empty value counts as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = require("DB_PATH")?;
        let platform = match require("PLATFORM")?.as_str() {
            "dev" => Platform::Dev,
            _ => Platform::Production,
        };
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| ".".to_owned());

        Ok(Self {
            bind_addr,
            db_path: PathBuf::from(db_path),
            platform,
            static_dir: PathBuf::from(static_dir),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
