//! Configuration management for the MindCare API service.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Main configuration for the MindCare service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindcareConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,

    /// Supportive-chat upstream configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
        }
    }
}

fn default_http_addr() -> SocketAddr {
    "0.0.0.0:3333".parse().unwrap()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Maximum admitted requests per client per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window duration in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of expired buckets, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl RateLimitingConfig {
    /// Get the window duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_max_requests() -> u32 {
    30
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    300
}

/// Supportive-chat upstream configuration.
///
/// The bearer token is read from the environment variable named by
/// `api_key_env`; the token itself never appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the chat-completion API
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Model to request from the upstream
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion length cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Name of the environment variable holding the bearer token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_upstream_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl MindcareConfig {
    /// Load configuration from a YAML file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| crate::error::MindcareError::Config(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MindcareConfig::default();

        assert_eq!(config.server.http_addr.port(), 3333);
        assert_eq!(config.rate_limiting.max_requests, 30);
        assert_eq!(config.rate_limiting.window(), Duration::from_secs(60));
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.chat.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_parse_partial_config_fills_defaults() {
        let yaml = r#"
rate_limiting:
  max_requests: 5
  window_secs: 10
"#;
        let config = MindcareConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.rate_limiting.max_requests, 5);
        assert_eq!(config.rate_limiting.window(), Duration::from_secs(10));
        assert_eq!(config.rate_limiting.sweep_interval(), Duration::from_secs(300));
        assert_eq!(config.server.http_addr.port(), 3333);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
server:
  http_addr: 127.0.0.1:8080
rate_limiting:
  max_requests: 100
  window_secs: 60
  sweep_interval_secs: 30
chat:
  upstream_url: http://localhost:11434/v1
  model: llama3
  max_tokens: 128
  temperature: 0.2
  api_key_env: CHAT_API_KEY
"#;
        let config = MindcareConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.server.http_addr.port(), 8080);
        assert_eq!(config.rate_limiting.max_requests, 100);
        assert_eq!(config.chat.upstream_url, "http://localhost:11434/v1");
        assert_eq!(config.chat.api_key_env, "CHAT_API_KEY");
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let result = MindcareConfig::from_yaml("rate_limiting: [not, a, map]");
        assert!(result.is_err());
    }
}
