// File: storefront-api/src/config.rs
// Purpose: Configuration parsing from storefront.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store_api: StoreApiConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Store API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreApiConfig {
    /// Upper bound for `limit` in search criteria
    #[serde(default)]
    pub max_limit: Option<usize>,

    /// Access key of the sales channel installed on start-up
    #[serde(default = "default_access_key")]
    pub default_access_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_level")]
    pub level: String,
}

// Default values
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_access_key() -> String {
    "SWSCDEFAULTACCESSKEY".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StoreApiConfig {
    fn default() -> Self {
        Self {
            max_limit: None,
            default_access_key: default_access_key(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load configuration from storefront.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./storefront.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("storefront.toml")
    }

    /// Apply `STOREFRONT_HOST`, `STOREFRONT_PORT` and `STOREFRONT_LOG`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("STOREFRONT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("STOREFRONT_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid STOREFRONT_PORT: {port}"))?;
        }
        if let Some(level) = lookup("STOREFRONT_LOG") {
            self.log.level = level;
        }
        Ok(self)
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
