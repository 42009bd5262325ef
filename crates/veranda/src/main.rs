//! Veranda - visitor feedback sentiment tooling

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use veranda_cache::{CacheManager, CacheSettings, MemoryBackend};
use veranda_classify::{
    ClientSettings, FeaturePolicy, HttpClassifier, HttpClassifierConfig, RetryPolicy,
    SentimentClient,
};

/// Veranda - classify visitor feedback from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/veranda.toml")]
    config: String,

    /// Read the feature policy from the environment instead of the config
    /// file (VERANDA_CLASSIFICATION_ENABLED and friends)
    #[arg(long)]
    env_policy: bool,

    /// Free-text feedback to classify
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Veranda v{}", env!("CARGO_PKG_VERSION"));

    let text = args.text.join(" ");
    if text.trim().is_empty() {
        anyhow::bail!("No feedback text given");
    }

    // Open the cache facade over the in-process backend
    let cache = CacheManager::open(
        Arc::new(MemoryBackend::new()),
        CacheSettings {
            default_ttl: Duration::from_secs(config.cache.default_ttl_secs),
            sweep_interval: Duration::from_secs(config.cache.sweep_interval_secs),
        },
    );

    // Build the upstream client and the classification client around it
    let upstream = Arc::new(HttpClassifier::new(HttpClassifierConfig {
        endpoint: config.classifier.endpoint.clone(),
        model: config.classifier.model.clone(),
        api_token: config.classifier.api_token.clone(),
        request_timeout: Duration::from_millis(config.classifier.timeout_ms),
    })?);

    let policy = if args.env_policy {
        FeaturePolicy::from_env()
    } else {
        config.classifier.policy.clone()
    };

    let client = SentimentClient::new(
        upstream,
        cache.clone(),
        RetryPolicy::new(
            config.classifier.max_attempts,
            Duration::from_millis(config.classifier.base_delay_ms),
            config.classifier.backoff_multiplier,
        ),
        policy,
        ClientSettings {
            result_ttl: Duration::from_secs(config.classifier.result_ttl_secs),
            call_timeout: Duration::from_millis(config.classifier.timeout_ms),
        },
    );

    let result = client.classify(&text).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    cache.close();
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
