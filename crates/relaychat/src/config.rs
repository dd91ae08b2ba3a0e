use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }

    /// Load the file, apply process environment overrides, then validate.
    pub async fn resolve(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load(path).await?;
        config.upstream.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// The server request timeout must outlast the upstream timeout, so a slow
    /// upstream ends as a relay error instead of a bare 408.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let server = self.server.request_timeout_seconds;
        let upstream = self.upstream.timeout_seconds;
        if server <= upstream {
            return Err(ConfigError::Timeouts { server, upstream });
        }
        Ok(())
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// UpstreamConfig
// ============================================================================

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_SITE_NAME: &str = "SITE_NAME";
pub const ENV_MODEL: &str = "MODEL";

/// Settings for the upstream chat-completions provider.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential. Not validated locally; a missing key surfaces as an
    /// upstream authentication failure.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Sent as `X-Title` for OpenRouter attribution.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            site_url: default_site_url(),
            site_name: default_site_name(),
            model: default_model(),
            timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Override fields from environment variables, looked up through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(site_url) = get(ENV_SITE_URL) {
            self.site_url = site_url;
        }
        if let Some(site_name) = get(ENV_SITE_NAME) {
            self.site_name = site_name;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_site_name() -> String {
    "My OpenRouter Demo".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-r1-0528-qwen3-8b:free".to_string()
}

fn default_upstream_timeout() -> u64 {
    120
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error(
        "server.request_timeout_seconds ({server}) must be greater than upstream.timeout_seconds ({upstream})"
    )]
    Timeouts { server: u64, upstream: u64 },
}

// ============================================================================
// Tests
// ============================================================================
