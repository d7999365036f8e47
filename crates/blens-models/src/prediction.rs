//! Ranked prediction output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One breed label paired with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BreedScore {
    /// Breed label as reported by (or resolved for) the classifier
    pub label: String,

    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl BreedScore {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Reconciled prediction result.
///
/// `top_k` is sorted descending by confidence; ties keep the order the
/// classifier reported them in. The best match is always `top_k[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RankedPrediction {
    /// Best-matching breed label
    pub label: String,

    /// Confidence of the best match
    pub confidence: f64,

    /// Ranked matches, best first, truncated to the configured K
    pub top_k: Vec<BreedScore>,
}

impl RankedPrediction {
    /// Build from an already-ranked list; the first entry is the best match.
    pub fn from_ranked(top_k: Vec<BreedScore>) -> Option<Self> {
        let best = top_k.first()?;
        Some(Self {
            label: best.label.clone(),
            confidence: best.confidence,
            top_k,
        })
    }
}
