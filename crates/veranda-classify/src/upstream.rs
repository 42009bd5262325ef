//! Upstream classification endpoint client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ClassifyError;
use crate::model::LabelScore;

/// Request/response boundary to the external text-classification model.
///
/// Kept behind a trait so tests (and alternative transports) can substitute
/// for the HTTP implementation.
#[async_trait]
pub trait ClassifierUpstream: Send + Sync {
    /// Classify `text`, returning the raw label/score candidates.
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifyError>;
}

/// HTTP classifier configuration
#[derive(Debug, Clone)]
pub struct HttpClassifierConfig {
    /// Endpoint URL of the classification service
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Optional bearer token
    pub api_token: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Some providers wrap the candidate list per input; accept both shapes and
/// use the first group.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

impl ClassifyResponse {
    fn into_candidates(self) -> Vec<LabelScore> {
        match self {
            ClassifyResponse::Flat(candidates) => candidates,
            ClassifyResponse::Nested(groups) => groups.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Reqwest-backed upstream client.
pub struct HttpClassifier {
    config: HttpClassifierConfig,
    client: Client,
}

impl HttpClassifier {
    pub fn new(config: HttpClassifierConfig) -> Result<Self, ClassifyError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!("Created classifier client for {}", config.endpoint);

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ClassifierUpstream for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifyError> {
        debug!("Classifying {} bytes of text upstream", text.len());

        let mut request = self.client.post(&self.config.endpoint).json(&ClassifyRequest {
            model: &self.config.model,
            input: text,
        });

        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClassifyError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        let parsed: ClassifyResponse = serde_json::from_str(&body)
            .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;

        Ok(parsed.into_candidates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_response_shape() {
        let parsed: ClassifyResponse =
            serde_json::from_str(r#"[{"label":"POSITIVE","score":0.93}]"#).unwrap();
        let candidates = parsed.into_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "POSITIVE");
    }

    #[test]
    fn test_nested_response_shape() {
        let parsed: ClassifyResponse = serde_json::from_str(
            r#"[[{"label":"NEGATIVE","score":0.8},{"label":"POSITIVE","score":0.2}]]"#,
        )
        .unwrap();
        let candidates = parsed.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "NEGATIVE");
    }

    #[test]
    fn test_malformed_response_is_invalid() {
        let parsed: Result<ClassifyResponse, _> =
            serde_json::from_str(r#"{"error":"overloaded"}"#);
        assert!(parsed.is_err());
    }
}
