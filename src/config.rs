//! Client configuration.
//!
//! Resolution order, later sources winning:
//! 1. Built-in defaults
//! 2. JSON file at `$QSIM_CLIENT_CONFIG`, or `<config_dir>/qsim-client/config.json`
//! 3. `QSIM_SERVER_ADDR`, `QSIM_CLIENT_ID`, `QSIM_READ_TIMEOUT_MS`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::qbus::DEFAULT_MAX_FRAME_LEN;

/// Default qSim server address.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:27020";
/// Default client mnemonic sent at registration.
pub const DEFAULT_CLIENT_ID: &str = "qSim-qcln-client";
/// Default per-response read timeout.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;

pub const ENV_CONFIG_PATH: &str = "QSIM_CLIENT_CONFIG";
pub const ENV_SERVER_ADDR: &str = "QSIM_SERVER_ADDR";
pub const ENV_CLIENT_ID: &str = "QSIM_CLIENT_ID";
pub const ENV_READ_TIMEOUT_MS: &str = "QSIM_READ_TIMEOUT_MS";

/// Connection settings for a [`QsimClient`](crate::client::QsimClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server `host:port`.
    pub server_addr: String,
    /// Mnemonic sent in the REGISTER `id` parameter.
    pub client_id: String,
    /// Read timeout per response in milliseconds; `None` or `0` waits forever.
    pub read_timeout_ms: Option<u64>,
    /// Connection attempts before giving up (exponential backoff between).
    pub connect_attempts: u32,
    /// Largest response frame accepted, in bytes.
    pub max_frame_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            read_timeout_ms: Some(DEFAULT_READ_TIMEOUT_MS),
            connect_attempts: 1,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl ClientConfig {
    /// Defaults with the given server address.
    pub fn with_server_addr(addr: impl Into<String>) -> Self {
        Self {
            server_addr: addr.into(),
            ..Self::default()
        }
    }

    /// Effective read timeout. `0` means no timeout, as with the env override.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Resolve the effective configuration from file and process environment.
    pub fn resolve() -> Result<Self> {
        let path = std::env::var_os(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.is_file() => {
                debug!("Loading client config from {}", path.display());
                Self::load(&path)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `QSIM_*` overrides looked up through `lookup`.
    ///
    /// An empty or `0` read timeout disables the timeout.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_SERVER_ADDR) {
            self.server_addr = addr;
        }
        if let Some(id) = lookup(ENV_CLIENT_ID) {
            self.client_id = id;
        }
        if let Some(ms) = lookup(ENV_READ_TIMEOUT_MS) {
            let ms = ms.trim();
            self.read_timeout_ms = match ms {
                "" | "0" => None,
                _ => Some(
                    ms.parse()
                        .with_context(|| format!("Invalid {}: {:?}", ENV_READ_TIMEOUT_MS, ms))?,
                ),
            };
        }
        Ok(())
    }
}

/// `<config_dir>/qsim-client/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qsim-client").join("config.json"))
}
