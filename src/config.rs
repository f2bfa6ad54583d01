// src/config.rs
// =============================================================================
// This file holds the runtime configuration.
//
// Everything the data source needs (where the API lives, which repositories
// to hide, how to identify ourselves) is a plain value handed to it when it
// is constructed. There are no global statics, so two sources with different
// settings can live side by side (tests do exactly that).
//
// Precedence, lowest to highest:
// 1. Config::default()
// 2. JSON file passed with --config
// 3. GITHUB_TOKEN environment variable
// 4. Command-line flags (applied in main.rs)
//
// Rust concepts:
// - #[serde(default)]: missing fields fall back to Default::default()
// - thiserror: typed validation errors
// - anyhow::Context: attach "what were we doing" to IO/parse errors
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Public GitHub API root
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repositories hidden from every listing unless configured otherwise
pub const DEFAULT_EXCLUDED: &[&str] = &["liamnewmarch.github.io"];

/// How many page mounts are fetched at the same time
pub const DEFAULT_MAX_CONCURRENT_MOUNTS: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL '{0}': {1}")]
    InvalidBaseUrl(String, String),

    #[error("Unsupported base URL scheme '{0}'. Must be http or https")]
    UnsupportedScheme(String),

    #[error("max_concurrent_mounts must be at least 1")]
    ZeroConcurrency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API root; /users/{user}/repos is appended to it
    pub base_url: String,
    /// Repository names never listed
    pub excluded: BTreeSet<String>,
    /// Sent as User-Agent (GitHub rejects requests without one)
    pub user_agent: String,
    /// Optional API token, sent as a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub max_concurrent_mounts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            excluded: DEFAULT_EXCLUDED.iter().map(|name| name.to_string()).collect(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            token: None,
            max_concurrent_mounts: DEFAULT_MAX_CONCURRENT_MOUNTS,
        }
    }
}

impl Config {
    /// Loads the configuration: defaults, then the optional JSON file, then
    /// the GITHUB_TOKEN environment variable.
    ///
    /// Not validated here: command-line flags still go on top, so call
    /// `validate` once they have been applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                config.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Reads a JSON config file. Fields the file leaves out keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Checks the values that would otherwise only fail at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;

        if self.max_concurrent_mounts == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        Ok(())
    }

    /// Parses the base URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(self.base_url.clone(), e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        Ok(url)
    }
}
