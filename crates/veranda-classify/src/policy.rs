//! Feature flags and thresholds

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Externally supplied feature configuration, read-only to this subsystem.
///
/// Sourced from the host application's config or the environment at process
/// start; the classification path only consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePolicy {
    /// Master switch for the upstream classification path. When false,
    /// every call is served by the local fallback classifier.
    #[serde(default = "default_enabled")]
    pub classification_enabled: bool,
    /// Results scoring below this are flagged as low-confidence in the logs
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Reserved for the sibling moderation feature
    #[serde(default = "default_toxicity_threshold")]
    pub toxicity_threshold: f64,
}

impl Default for FeaturePolicy {
    fn default() -> Self {
        Self {
            classification_enabled: default_enabled(),
            confidence_threshold: default_confidence_threshold(),
            toxicity_threshold: default_toxicity_threshold(),
        }
    }
}

impl FeaturePolicy {
    /// Build a policy from environment variables, falling back to defaults
    /// for anything unset or unparsable.
    ///
    /// Recognized variables: `VERANDA_CLASSIFICATION_ENABLED`,
    /// `VERANDA_CONFIDENCE_THRESHOLD`, `VERANDA_TOXICITY_THRESHOLD`.
    pub fn from_env() -> Self {
        Self {
            classification_enabled: env_parse(
                "VERANDA_CLASSIFICATION_ENABLED",
                default_enabled(),
            ),
            confidence_threshold: env_parse(
                "VERANDA_CONFIDENCE_THRESHOLD",
                default_confidence_threshold(),
            ),
            toxicity_threshold: env_parse(
                "VERANDA_TOXICITY_THRESHOLD",
                default_toxicity_threshold(),
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable value for {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

fn default_enabled() -> bool {
    true
}

fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_toxicity_threshold() -> f64 {
    0.8
}
