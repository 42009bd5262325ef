//! Configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use veranda_classify::FeaturePolicy;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Cache facade configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when callers omit one, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub default_ttl_secs: u64,
    /// Background sweep interval, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_cache_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Classification client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Feature flags and thresholds consumed by the subsystem
    #[serde(flatten)]
    pub policy: FeaturePolicy,
    /// Endpoint URL of the classification service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional bearer token
    #[serde(default)]
    pub api_token: Option<String>,
    /// Total attempts per call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff growth factor
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Bound on the whole retry loop, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// TTL for cached classification results, in seconds
    #[serde(default = "default_result_ttl_secs")]
    pub result_ttl_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            policy: FeaturePolicy::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_token: None,
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            timeout_ms: default_timeout_ms(),
            result_ttl_secs: default_result_ttl_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_endpoint() -> String {
    "http://localhost:8090/v1/classify".to_string()
}

fn default_model() -> String {
    "sentiment-base".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_timeout_ms() -> u64 {
    8000
}

fn default_result_ttl_secs() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}
