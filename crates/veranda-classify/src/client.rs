//! Classification client with cache-aside and fallback

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use veranda_cache::CacheManager;

use crate::fallback::fallback_classification;
use crate::model::{Classification, Sentiment, best_candidate};
use crate::policy::FeaturePolicy;
use crate::retry::RetryPolicy;
use crate::upstream::ClassifierUpstream;

/// Client-level knobs
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// TTL for cached classification results (distinct from the cache
    /// facade's generic default)
    pub result_ttl: Duration,
    /// Bound on the whole retry loop, attempts and backoff included. When
    /// it elapses the client falls back immediately instead of waiting out
    /// the remaining attempts.
    pub call_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            result_ttl: Duration::from_secs(600),
            call_timeout: Duration::from_secs(8),
        }
    }
}

/// Turns free-text feedback into a sentiment label without ever blocking on
/// or surfacing upstream failures.
///
/// Flow: feature flag check, cache-aside lookup keyed by the input text,
/// retry-wrapped upstream call on a miss, and the local keyword heuristic
/// whenever the upstream path is disabled or exhausted. Fallback results are
/// deliberately not cached, so a transient outage does not pin heuristic
/// answers for the TTL window once the upstream recovers.
pub struct SentimentClient {
    upstream: Arc<dyn ClassifierUpstream>,
    cache: Arc<CacheManager>,
    retry: RetryPolicy,
    policy: FeaturePolicy,
    settings: ClientSettings,
}

impl SentimentClient {
    pub fn new(
        upstream: Arc<dyn ClassifierUpstream>,
        cache: Arc<CacheManager>,
        retry: RetryPolicy,
        policy: FeaturePolicy,
        settings: ClientSettings,
    ) -> Self {
        Self {
            upstream,
            cache,
            retry,
            policy,
            settings,
        }
    }

    /// Classify `text`. Always produces a result; the `is_fallback` flag
    /// tells the presentation layer when the heuristic answered.
    pub async fn classify(&self, text: &str) -> Classification {
        if !self.policy.classification_enabled {
            debug!("Classification disabled by policy, using fallback");
            return fallback_classification(text);
        }

        // Cache hits are authoritative, no re-validation.
        if let Some(cached) = self.cache.get_json::<Classification>(text).await {
            debug!("Classification cache hit");
            return cached;
        }

        let outcome = tokio::time::timeout(
            self.settings.call_timeout,
            self.retry.invoke(|| self.upstream.classify(text)),
        )
        .await;

        let candidates = match outcome {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                warn!("Upstream classification failed: {}, using fallback", e);
                return fallback_classification(text);
            }
            Err(_) => {
                warn!(
                    "Classification timed out after {:?}, using fallback",
                    self.settings.call_timeout
                );
                return fallback_classification(text);
            }
        };

        let Some(best) = best_candidate(&candidates) else {
            warn!("Upstream returned no candidates, using fallback");
            return fallback_classification(text);
        };

        let result = Classification {
            label: Sentiment::from_label(&best.label),
            score: best.score,
            is_fallback: false,
        };

        if result.score < self.policy.confidence_threshold {
            debug!(
                "Upstream confidence {:.2} below threshold {:.2}",
                result.score, self.policy.confidence_threshold
            );
        }

        self.cache
            .set_json(text, &result, Some(self.settings.result_ttl))
            .await;

        result
    }
}
