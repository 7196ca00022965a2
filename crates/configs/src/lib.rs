//! # configs
//!
//! Runtime configuration for the campus feed client, layered from an
//! optional `campus-feed.toml`, environment variables prefixed
//! `CAMPUS_FEED__`, and a developer `.env` file. Secrets never leave
//! their `secrecy` wrapper via `Debug`.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Everything the binary needs to wire a backend adapter and controller.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://10.0.2.2:8081` against a local stack.
    pub base_url: String,
    /// Bearer token of the logged-in session, if any.
    #[serde(default)]
    pub auth_token: Option<SecretString>,
    /// Id of the session user; gates the edit/delete menu actions.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Per-request timeout, matching the backend's client tuning.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Feed page size.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    20
}

impl ClientConfig {
    /// Loads configuration; every layer is optional except `base_url`,
    /// which falls back to the local development stack.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is not an error; it is a developer convenience.
        dotenvy::dotenv().ok();
        let settings = Config::builder()
            .set_default("base_url", "http://localhost:8081")?
            .add_source(File::with_name("campus-feed").required(false))
            .add_source(
                Environment::with_prefix("CAMPUS_FEED")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        let config: Self = settings.try_deserialize()?;
        debug!(base_url = %config.base_url, page_size = config.page_size, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_when_only_base_url_is_given() {
        let config: ClientConfig = Config::builder()
            .set_override("base_url", "http://localhost:9")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.page_size, 20);
        assert!(config.auth_token.is_none());
        assert!(config.user_id.is_none());
    }
}
