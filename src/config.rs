//! Runtime configuration
//!
//! Every value has a fixed default. An optional TOML file named by the
//! `NETCHAT_CONFIG` environment variable may override any of them.

use std::env;
use std::fs;

use serde::Deserialize;

use crate::error::AppError;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_ENV: &str = "NETCHAT_CONFIG";

/// Default address the server listens on and the client connects to
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Shared server/client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listen address (server) and connect address (client)
    pub address: String,
    /// Longest accepted inbound line in bytes
    pub max_line_length: usize,
    /// Outbound queue depth per session
    pub session_buffer: usize,
    /// Command queue depth of the server actor
    pub command_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDR.to_string(),
            max_line_length: 4096,
            session_buffer: 32,
            command_buffer: 256,
        }
    }
}

impl Config {
    /// Load the configuration, applying the file from `NETCHAT_CONFIG` if set
    pub fn load() -> Result<Self, AppError> {
        match env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = fs::read_to_string(&path)
                    .map_err(|e| AppError::Config(format!("{}: {}", path, e)))?;
                Self::from_toml(&text)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    ///
    /// Channel depths and the line limit must be non-zero.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("max_line_length", self.max_line_length),
            ("session_buffer", self.session_buffer),
            ("command_buffer", self.command_buffer),
        ] {
            if value == 0 {
                return Err(AppError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }
}
