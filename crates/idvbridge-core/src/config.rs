// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration and its on-disk persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Runtime settings for the bridge and its image pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL used when the host passes a bare session token.
    pub default_base_url: String,
    /// Directory holding bundled branding resources (`<name>.png` etc.).
    pub resource_dir: PathBuf,
    /// Timeout applied to remote logo fetches.
    pub http_timeout_secs: u64,
    /// Worker threads in the decode pipeline runtime.
    pub decode_threads: usize,
    /// User-Agent sent with remote logo fetches.
    pub user_agent: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_base_url: "https://magic.veriff.me".into(),
            resource_dir: PathBuf::from("resources"),
            http_timeout_secs: 30,
            decode_threads: 2,
            user_agent: concat!("idvbridge/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl BridgeConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Load `config.json` from `dir`, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                if path.exists() {
                    warn!(path = %path.display(), %err, "ignoring unreadable config");
                } else {
                    debug!(path = %path.display(), "no config file, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Load a configuration file from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Persist the configuration as pretty JSON into `dir`.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}

/// Return the bridge data directory (not created).
///
/// On desktop this uses a conventional location. On mobile the host should
/// pass its own documents directory instead.
pub fn data_dir() -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("idvbridge");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("idvbridge");
    }
    // Last resort
    std::env::temp_dir().join("idvbridge")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(BridgeConfig::load_or_default(dir.path()), BridgeConfig::default());
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig {
            decode_threads: 4,
            default_base_url: "https://staging.example.test".into(),
            ..Default::default()
        };
        config.persist(dir.path()).unwrap();
        assert_eq!(BridgeConfig::load_or_default(dir.path()), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"http_timeout_secs": 5}"#).unwrap();
        let config = BridgeConfig::load_or_default(dir.path());
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.default_base_url, "https://magic.veriff.me");
    }

    #[test]
    fn garbage_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();
        assert_eq!(BridgeConfig::load_or_default(dir.path()), BridgeConfig::default());
    }
}
