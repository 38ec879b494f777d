//! Configuration management for searchkit.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! It only describes how to reach the search backend and which request
//! defaults the CLI uses; the library itself never reads it implicitly.

use crate::core::error::{Result, SearchKitError};
use crate::core::types::{
    SearchRequest, DEFAULT_MAX_EXPANSIONS, DEFAULT_PAGE_SIZE, DEFAULT_SLOP, MAX_PAGE_SIZE,
};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const REDACTED: &str = "********";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Connection settings for an Elasticsearch-compatible backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// `http` or `https`
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Send `compatible-with` media types (needed for 8.x clusters
    /// talking to 7.x style clients)
    #[serde(default = "default_compatibility_mode")]
    pub compatibility_mode: bool,

    #[serde(default = "default_compatibility_version")]
    pub compatibility_version: u8,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

/// Defaults applied to requests built by the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_slop")]
    pub default_slop: u32,

    #[serde(default = "default_max_expansions")]
    pub default_max_expansions: u32,
}

// Default value functions
fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_compatibility_mode() -> bool {
    true
}

fn default_compatibility_version() -> u8 {
    7
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_slop() -> u32 {
    DEFAULT_SLOP
}

fn default_max_expansions() -> u32 {
    DEFAULT_MAX_EXPANSIONS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            compatibility_mode: default_compatibility_mode(),
            compatibility_version: default_compatibility_version(),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            default_slop: default_slop(),
            default_max_expansions: default_max_expansions(),
        }
    }
}

impl BackendConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:9200`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Media type sent as `Accept` and `Content-Type`
    pub fn media_type(&self) -> String {
        if self.compatibility_mode {
            format!(
                "application/vnd.elasticsearch+json;compatible-with={}",
                self.compatibility_version
            )
        } else {
            "application/json".to_string()
        }
    }
}

impl SearchConfig {
    /// A request for `text` carrying the configured defaults
    pub fn request(&self, text: impl Into<String>) -> SearchRequest {
        SearchRequest {
            page_size: self.default_page_size,
            slop: self.default_slop,
            max_expansions: self.default_max_expansions,
            ..SearchRequest::new(text)
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SearchKitError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. SEARCHKIT_CONFIG env var
    /// 2. XDG config file (~/.config/searchkit/config.toml)
    /// 3. ./searchkit.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SEARCHKIT_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("searchkit.toml").exists() {
                Self::from_file("searchkit.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Backend configuration
        if let Ok(scheme) = env::var("SEARCHKIT_BACKEND_SCHEME") {
            self.backend.scheme = scheme;
        }
        if let Ok(host) = env::var("SEARCHKIT_BACKEND_HOST") {
            self.backend.host = host;
        }
        if let Ok(port) = env::var("SEARCHKIT_BACKEND_PORT") {
            if let Ok(p) = port.parse() {
                self.backend.port = p;
            }
        }
        if let Ok(username) = env::var("SEARCHKIT_BACKEND_USERNAME") {
            self.backend.username = Some(username);
        }
        if let Ok(password) = env::var("SEARCHKIT_BACKEND_PASSWORD") {
            self.backend.password = Some(password);
        }
        if let Ok(mode) = env::var("SEARCHKIT_COMPATIBILITY_MODE") {
            if let Ok(m) = mode.parse() {
                self.backend.compatibility_mode = m;
            }
        }
        if let Ok(timeout) = env::var("SEARCHKIT_REQUEST_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.backend.request_timeout_sec = t;
            }
        }

        // Search configuration
        if let Ok(size) = env::var("SEARCHKIT_DEFAULT_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                self.search.default_page_size = s;
            }
        }
        if let Ok(slop) = env::var("SEARCHKIT_DEFAULT_SLOP") {
            if let Ok(s) = slop.parse() {
                self.search.default_slop = s;
            }
        }
        if let Ok(max) = env::var("SEARCHKIT_DEFAULT_MAX_EXPANSIONS") {
            if let Ok(m) = max.parse() {
                self.search.default_max_expansions = m;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.backend.scheme.as_str(), "http" | "https") {
            return Err(SearchKitError::ConfigError(format!(
                "Backend scheme must be http or https, got '{}'",
                self.backend.scheme
            )));
        }

        if self.backend.host.trim().is_empty() {
            return Err(SearchKitError::ConfigError(
                "Backend host must not be empty".to_string(),
            ));
        }

        if self.backend.port == 0 {
            return Err(SearchKitError::ConfigError(
                "Backend port must be non-zero".to_string(),
            ));
        }

        if self.backend.password.is_some() && self.backend.username.is_none() {
            return Err(SearchKitError::ConfigError(
                "Backend password is set without a username".to_string(),
            ));
        }

        if self.backend.request_timeout_sec == 0 {
            return Err(SearchKitError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        if self.search.default_page_size == 0 || self.search.default_page_size > MAX_PAGE_SIZE {
            return Err(SearchKitError::ConfigError(format!(
                "Default page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        if self.search.default_max_expansions == 0 {
            return Err(SearchKitError::ConfigError(
                "Default max expansions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Copy with the backend password masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.backend.password.is_some() {
            config.backend.password = Some(REDACTED.to_string());
        }
        config
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Backend: {}", self.backend.base_url());
        tracing::info!(
            "  Auth: {}",
            match &self.backend.username {
                Some(user) => format!("basic ({user}, password {REDACTED})"),
                None => "none".to_string(),
            }
        );
        tracing::info!("  Media type: {}", self.backend.media_type());
        tracing::info!("  Request timeout: {}s", self.backend.request_timeout_sec);
        tracing::info!("  Default page size: {}", self.search.default_page_size);
        tracing::info!("  Default slop: {}", self.search.default_slop);
        tracing::info!(
            "  Default max expansions: {}",
            self.search.default_max_expansions
        );
    }
}
