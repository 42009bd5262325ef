//! Veranda Classification Subsystem
//!
//! Turns free-text visitor feedback into a sentiment label while never
//! blocking or failing the caller: cache-aside over the Veranda cache
//! facade, an exponential-backoff retry wrapper around the upstream
//! classification endpoint, and a deterministic local fallback heuristic
//! for when that endpoint is disabled, rate-limited, or down.

pub mod client;
pub mod error;
pub mod fallback;
pub mod model;
pub mod policy;
pub mod retry;
pub mod upstream;

pub use client::{ClientSettings, SentimentClient};
pub use error::ClassifyError;
pub use fallback::fallback_classification;
pub use model::{Classification, LabelScore, Sentiment};
pub use policy::FeaturePolicy;
pub use retry::RetryPolicy;
pub use upstream::{ClassifierUpstream, HttpClassifier, HttpClassifierConfig};
