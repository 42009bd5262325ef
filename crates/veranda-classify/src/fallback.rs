//! Keyword-weighted fallback classifier

use tracing::debug;

use crate::model::{Classification, Sentiment};

/// Keywords counted as positive signal. Substring containment, no
/// tokenization; keep the sets free of entries that contain each other so a
/// single word never counts twice.
const POSITIVE_KEYWORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "awesome",
    "fantastic",
    "lovely",
    "enjoyable",
    "beautiful",
    "perfect",
    "friendly",
    "helpful",
    "recommend",
];

/// Keywords counted as negative signal.
const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "disappointing",
    "poor",
    "worst",
    "rude",
    "dirty",
    "boring",
    "broken",
    "unpleasant",
];

const BASE_SCORE: f64 = 0.6;
const SCORE_PER_MATCH: f64 = 0.05;
const MAX_SCORE: f64 = 0.85;

fn count_matches(text: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .map(|keyword| text.matches(keyword).count())
        .sum()
}

/// Deterministic local classifier used whenever the upstream path is
/// disabled, misconfigured, or exhausted.
///
/// Majority of keyword occurrences wins, with a confidence that grows with
/// the match count but stays bounded; ties (including no matches at all)
/// are NEUTRAL at 0.5. Always marks the result as a fallback.
pub fn fallback_classification(text: &str) -> Classification {
    let text = text.to_lowercase();
    let positive = count_matches(&text, POSITIVE_KEYWORDS);
    let negative = count_matches(&text, NEGATIVE_KEYWORDS);

    let (label, score) = if positive > negative {
        (
            Sentiment::Positive,
            (BASE_SCORE + SCORE_PER_MATCH * positive as f64).min(MAX_SCORE),
        )
    } else if negative > positive {
        (
            Sentiment::Negative,
            (BASE_SCORE + SCORE_PER_MATCH * negative as f64).min(MAX_SCORE),
        )
    } else {
        (Sentiment::Neutral, 0.5)
    };

    debug!(
        "Fallback classification: {} ({} positive, {} negative matches)",
        label, positive, negative
    );

    Classification {
        label,
        score,
        is_fallback: true,
    }
}
