//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/slotbook/config.toml` by default. Explicit command-line
//! flags take precedence over file values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::channel::Semantics;

/// Configuration for the slotbook client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server/connection settings.
    pub server: ServerSettings,
}

/// Server/connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server address as host:port.
    pub address: String,

    /// Per-attempt reply timeout in seconds.
    pub timeout: u64,

    /// Retransmissions after the first attempt, under at-least-once.
    pub retries: u32,

    /// Invocation semantics: "at-least-once" or "at-most-once".
    pub semantics: Semantics,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:5000".to_string(),
            timeout: 3,
            retries: 2,
            semantics: Semantics::AtLeastOnce,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, falling back to the
    /// defaults when no file exists.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slotbook")
            .join("config.toml")
    }
}
