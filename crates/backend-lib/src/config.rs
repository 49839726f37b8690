// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Secret used to sign and verify bearer tokens. Environment-sourced
    /// in deployment (`FORUM_TOKEN_SECRET`); the server refuses to start
    /// without one.
    pub token_secret: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            token_secret: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from `forum.toml` and `FORUM_`-prefixed
    /// environment variables, environment winning.
    pub fn load() -> Result<Self> {
        Self::load_from("forum.toml")
    }

    /// Load settings from an explicit config file path plus environment.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("FORUM_"))
            .extract()?;

        if settings.token_secret.is_empty() {
            bail!("token_secret is not set (use FORUM_TOKEN_SECRET or forum.toml)");
        }

        Ok(settings)
    }
}
