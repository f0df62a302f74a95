use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use typeahead_core::SessionConfig;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl DaemonConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&resolve_config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let raw = fs::read_to_string(config_path)
                .with_context(|| format!("failed to read config file {}", config_path.display()))?;
            let parsed: DaemonConfig = toml::from_str(&raw)
                .with_context(|| format!("failed to parse TOML from {}", config_path.display()))?;
            return Ok(parsed);
        }

        Ok(DaemonConfig::default())
    }
}

fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var("TYPEAHEAD_CONFIG") {
        return Path::new(&path).to_path_buf();
    }

    if let Some(base) = dirs::config_dir() {
        return base.join("typeahead").join("config.toml");
    }

    Path::new("/tmp/typeahead.toml").to_path_buf()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_socket_path() -> PathBuf {
    Path::new("/tmp/typeahead.sock").to_path_buf()
}

fn default_request_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_suggest_path")]
    pub suggest_path: String,
    /// Name of the query parameter carrying the prefix. The legacy
    /// `/autocomplete` route reads `prefix` instead of `q`.
    #[serde(default = "default_query_param")]
    pub query_param: String,
    #[serde(default = "default_accept_path")]
    pub accept_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            suggest_path: default_suggest_path(),
            query_param: default_query_param(),
            accept_path: default_accept_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_suggest_path() -> String {
    "/suggest".to_string()
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_accept_path() -> String {
    "/accept".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl SuggestConfig {
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            limit: self.limit.max(1),
        }
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            limit: default_limit(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_limit() -> usize {
    6
}

fn default_cache_capacity() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingConfig {
    #[serde(default = "default_trending_limit")]
    pub limit: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            limit: default_trending_limit(),
        }
    }
}

fn default_trending_limit() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IdentityConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}
