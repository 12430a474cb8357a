//! Configuration loaded from `scrivano.toml`.
//!
//! Missing values fall back to defaults. The `SCRIVANO_API_BASE`
//! environment variable takes precedence over the file.

use serde::Deserialize;
use std::path::Path;

use crate::error::ScrivanoError;

/// Top-level configuration loaded from `scrivano.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrivanoConfig {
    /// Base URL of the deployed job API.
    #[serde(default)]
    pub api_base: String,

    /// Seconds between status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Polling attempt budget before reporting a timeout.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Ledger record TTL in seconds.
    #[serde(default = "default_job_ttl_secs")]
    pub job_ttl_secs: i64,

    /// Capability URL lifetime in seconds. Never longer than the job TTL,
    /// so a stale job cannot be resurrected through a dangling link.
    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: i64,
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_job_ttl_secs() -> i64 {
    3600
}

fn default_url_ttl_secs() -> i64 {
    3600
}

impl Default for ScrivanoConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
            job_ttl_secs: default_job_ttl_secs(),
            url_ttl_secs: default_url_ttl_secs(),
        }
    }
}

impl ScrivanoConfig {
    /// Load configuration from `scrivano.toml` in the current directory,
    /// falling back to defaults if the file does not exist.
    pub fn load() -> Result<Self, ScrivanoError> {
        let path = Path::new("scrivano.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ScrivanoConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the config file.
        if let Ok(base) = std::env::var("SCRIVANO_API_BASE")
            && !base.is_empty()
        {
            config.api_base = base;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ScrivanoConfig::default();
        assert!(config.api_base.is_empty());
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.max_poll_attempts, 30);
        assert_eq!(config.job_ttl_secs, 3600);
        assert_eq!(config.url_ttl_secs, 3600);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_base = "https://api.example.com/dev"
            max_poll_attempts = 10
        "#;
        let config: ScrivanoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_base, "https://api.example.com/dev");
        assert_eq!(config.max_poll_attempts, 10);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.job_ttl_secs, 3600);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        // The test working directory normally has no scrivano.toml.
        let config = ScrivanoConfig::load().unwrap();
        assert_eq!(config.max_poll_attempts, 30);
    }
}
