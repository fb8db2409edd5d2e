//! Configuration management
//!
//! Settings live in `~/.quotebox/config.yaml`. A missing file means
//! defaults. The data directory can be moved with `QUOTEBOX_HOME`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "QUOTEBOX_HOME";

/// Public placeholder API used by the HTTP remote.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Which remote source the sync engine talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    /// In-memory simulator with artificial latency.
    #[default]
    Simulated,
    /// Real HTTP endpoint.
    Http,
}

impl std::fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteKind::Simulated => write!(f, "simulated"),
            RemoteKind::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote source backing sync
    pub remote: RemoteKind,

    /// Base URL of the HTTP remote
    pub remote_url: String,

    /// Seconds between periodic sync cycles in watch mode
    pub sync_interval_secs: u64,

    /// Artificial latency of the simulated remote
    pub simulated_latency_ms: u64,

    /// Request timeout for the HTTP remote
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteKind::default(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            sync_interval_secs: 30,
            simulated_latency_ms: 500,
            http_timeout_secs: 10,
        }
    }
}

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "remote",
    "remote_url",
    "sync_interval_secs",
    "simulated_latency_ms",
    "http_timeout_secs",
];

impl Config {
    /// Loads the config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the config from `path`, returning defaults if it does not exist.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_saphyr::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {e}"))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.sync_interval_secs == 0 {
            anyhow::bail!("sync_interval_secs must be at least 1");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the config to `path` atomically.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_saphyr::to_string(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &content).context("Failed to write config temp file")?;
        fs::rename(&temp_path, path).context("Failed to rename config file")?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.yaml"))
    }

    /// Reads a single setting as a display string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "remote" => Some(self.remote.to_string()),
            "remote_url" => Some(self.remote_url.clone()),
            "sync_interval_secs" => Some(self.sync_interval_secs.to_string()),
            "simulated_latency_ms" => Some(self.simulated_latency_ms.to_string()),
            "http_timeout_secs" => Some(self.http_timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Updates a single setting from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote" => {
                self.remote = match value {
                    "simulated" => RemoteKind::Simulated,
                    "http" => RemoteKind::Http,
                    other => anyhow::bail!("Unknown remote '{other}' (expected simulated or http)"),
                }
            }
            "remote_url" => self.remote_url = value.trim_end_matches('/').to_string(),
            "sync_interval_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("'{value}' is not a number of seconds"))?;
                if secs == 0 {
                    anyhow::bail!("sync_interval_secs must be at least 1");
                }
                self.sync_interval_secs = secs;
            }
            "simulated_latency_ms" => {
                self.simulated_latency_ms = value
                    .parse()
                    .with_context(|| format!("'{value}' is not a number of milliseconds"))?
            }
            "http_timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("'{value}' is not a number of seconds"))?;
                if secs == 0 {
                    anyhow::bail!("http_timeout_secs must be at least 1");
                }
                self.http_timeout_secs = secs;
            }
            other => anyhow::bail!(
                "Unknown config key '{other}'. Valid keys: {}",
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

/// Returns the Quotebox data directory.
///
/// `$QUOTEBOX_HOME` if set, otherwise `~/.quotebox`.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    Ok(dirs::home_dir()
        .context("Could not find home directory")?
        .join(".quotebox"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.remote, RemoteKind::Simulated);
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
        assert_eq!(config.sync_interval_secs, 30);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.set("remote", "http").unwrap();
        config.set("sync_interval_secs", "90").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.remote, RemoteKind::Http);
        assert_eq!(loaded.sync_interval_secs, 90);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "remote: http\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.remote, RemoteKind::Http);
        assert_eq!(config.simulated_latency_ms, 500);
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut config = Config::default();
        let err = config.set("colour", "blue").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("remote", "carrier-pigeon").is_err());
        assert!(config.set("sync_interval_secs", "soon").is_err());
        assert!(config.set("sync_interval_secs", "0").is_err());
        assert!(config.set("http_timeout_secs", "0").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_zero_intervals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        fs::write(&path, "sync_interval_secs: 0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("sync_interval_secs must be at least 1"));

        fs::write(&path, "http_timeout_secs: 0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("http_timeout_secs must be at least 1"));
    }

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "{key} should be readable");
        }
        assert!(config.get("nope").is_none());
    }
}
