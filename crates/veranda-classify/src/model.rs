//! Classification result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-value sentiment vocabulary every upstream label is normalized into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Normalize an arbitrary upstream label: anything containing
    /// "positive" (case-insensitive) maps to Positive, "negative" to
    /// Negative, everything else to Neutral.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("positive") {
            Sentiment::Positive
        } else if label.contains("negative") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable classification outcome, produced fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub label: Sentiment,
    /// Confidence in [0.0, 1.0]
    pub score: f64,
    /// True when the local heuristic produced this result instead of the
    /// upstream model, so the presentation layer can flag reduced confidence
    pub is_fallback: bool,
}

/// A single label/score candidate as returned by the upstream endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Pick the candidate with the maximum score, ties broken by first
/// occurrence. Returns None for an empty candidate list.
pub fn best_candidate(candidates: &[LabelScore]) -> Option<&LabelScore> {
    let mut best: Option<&LabelScore> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_normalization() {
        assert_eq!(Sentiment::from_label("POSITIVE"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("LABEL_positive"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("Negative"), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("very_negative"), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("mixed"), Sentiment::Neutral);
        assert_eq!(Sentiment::from_label(""), Sentiment::Neutral);
    }

    #[test]
    fn test_best_candidate_max_score() {
        let candidates = vec![
            LabelScore {
                label: "NEUTRAL".to_string(),
                score: 0.2,
            },
            LabelScore {
                label: "POSITIVE".to_string(),
                score: 0.7,
            },
            LabelScore {
                label: "NEGATIVE".to_string(),
                score: 0.1,
            },
        ];

        assert_eq!(best_candidate(&candidates).unwrap().label, "POSITIVE");
    }

    #[test]
    fn test_best_candidate_tie_keeps_first() {
        let candidates = vec![
            LabelScore {
                label: "NEGATIVE".to_string(),
                score: 0.5,
            },
            LabelScore {
                label: "POSITIVE".to_string(),
                score: 0.5,
            },
        ];

        assert_eq!(best_candidate(&candidates).unwrap().label, "NEGATIVE");
    }

    #[test]
    fn test_best_candidate_empty() {
        assert!(best_candidate(&[]).is_none());
    }

    #[test]
    fn test_classification_json_shape() {
        let result = Classification {
            label: Sentiment::Positive,
            score: 0.93,
            is_fallback: false,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "POSITIVE");
        assert_eq!(json["is_fallback"], false);
    }
}
