//! Configuration loading.
//!
//! Settings live in a TOML file under the platform config directory. A
//! missing or malformed file is never fatal: the defaults apply and a
//! warning is logged, so the tool always starts.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::broadcast::DEFAULT_PORT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP port the accept command listens on (loopback only).
    pub listen_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Initial pacing delay applied to a freshly opened capture, in
    /// milliseconds. Zero sends each chunk as a single write.
    pub delay_ms: u64,
}

impl Config {
    /// Path of the config file: `<platform config dir>/vtscope/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vtscope").join("config.toml"))
    }

    /// Load the config file, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("no config directory on this platform, using defaults");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    fn parse(content: &str, path: &std::path::Path) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed config, using defaults");
                Self::default()
            }
        }
    }
}
