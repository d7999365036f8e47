//! Prediction reconciliation.
//!
//! Validates a raw response and produces the ranked client-facing result.
//! Validation is all-or-nothing: a missing, empty or mismatched score
//! array fails the request rather than producing a partial ranking.

use std::cmp::Ordering;

use blens_models::{BreedCatalog, BreedScore, RankedPrediction};

use crate::error::ReconciliationError;
use crate::response::{PredictionShape, RawPredictionResponse};

/// Reconcile a raw prediction response into a ranked result.
///
/// The best match is the first occurring maximum confidence; `top_k` is
/// sorted descending with ties kept in response order and truncated to
/// `top_k` entries.
pub fn reconcile(
    response: &RawPredictionResponse,
    catalog: &BreedCatalog,
    top_k: usize,
) -> Result<RankedPrediction, ReconciliationError> {
    let first = response
        .predictions
        .first()
        .ok_or(ReconciliationError::NoPredictions)?;

    let (labels, scores) = match PredictionShape::classify(first) {
        PredictionShape::Labeled { labels, scores } => (labels, scores),
        PredictionShape::ScoresOnly { scores } => {
            if catalog.len() < scores.len() {
                return Err(ReconciliationError::CatalogTooSmall {
                    scores: scores.len(),
                    catalog: catalog.len(),
                });
            }
            let labels = catalog.labels()[..scores.len()].to_vec();
            (labels, scores)
        }
        PredictionShape::Unrecognized(raw) => {
            return Err(ReconciliationError::UnrecognizedShape { raw });
        }
    };

    if scores.is_empty() {
        return Err(ReconciliationError::EmptyScores);
    }
    if labels.len() != scores.len() {
        return Err(ReconciliationError::LengthMismatch {
            labels: labels.len(),
            scores: scores.len(),
        });
    }
    let mut ranked: Vec<BreedScore> = labels
        .into_iter()
        .zip(scores)
        .map(|(label, confidence)| BreedScore { label, confidence })
        .collect();

    // Stable sort: equal confidences keep their response order, so the
    // first occurring maximum stays in front.
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_k);

    RankedPrediction::from_ranked(ranked).ok_or(ReconciliationError::EmptyScores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(prediction: serde_json::Value) -> RawPredictionResponse {
        serde_json::from_value(json!({ "predictions": [prediction] })).unwrap()
    }

    fn catalog() -> BreedCatalog {
        BreedCatalog::new(vec![
            "Beagle".into(),
            "Siberian Husky".into(),
            "Pug".into(),
            "Boxer".into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_best_match_and_order() {
        let raw = response(json!({
            "displayNames": ["Beagle", "Husky", "Pug"],
            "confidences": [0.2, 0.7, 0.1]
        }));
        let ranked = reconcile(&raw, &catalog(), 5).unwrap();

        assert_eq!(ranked.label, "Husky");
        assert_eq!(ranked.confidence, 0.7);
        assert_eq!(
            ranked.top_k,
            vec![
                BreedScore::new("Husky", 0.7),
                BreedScore::new("Beagle", 0.2),
                BreedScore::new("Pug", 0.1),
            ]
        );
    }

    #[test]
    fn test_top_k_truncation() {
        let raw = response(json!({
            "displayNames": ["A", "B", "C", "D"],
            "confidences": [0.1, 0.4, 0.3, 0.2]
        }));
        let ranked = reconcile(&raw, &catalog(), 2).unwrap();

        assert_eq!(ranked.top_k.len(), 2);
        assert_eq!(ranked.top_k[0].label, "B");
        assert_eq!(ranked.top_k[1].label, "C");
    }

    #[test]
    fn test_ties_keep_response_order() {
        let raw = response(json!({
            "displayNames": ["A", "B", "C"],
            "confidences": [0.4, 0.4, 0.2]
        }));
        let ranked = reconcile(&raw, &catalog(), 5).unwrap();

        assert_eq!(ranked.label, "A");
        assert_eq!(ranked.top_k[0].label, "A");
        assert_eq!(ranked.top_k[1].label, "B");
    }

    #[test]
    fn test_scores_resolve_through_catalog() {
        let raw = response(json!({ "scores": [0.1, 0.8, 0.1] }));
        let ranked = reconcile(&raw, &catalog(), 5).unwrap();

        assert_eq!(ranked.label, "Siberian Husky");
        assert_eq!(ranked.top_k.len(), 3);
    }

    #[test]
    fn test_catalog_shorter_than_scores_fails() {
        let raw = response(json!({ "scores": [0.1, 0.2, 0.3, 0.25, 0.15] }));
        assert!(matches!(
            reconcile(&raw, &catalog(), 5),
            Err(ReconciliationError::CatalogTooSmall { scores: 5, catalog: 4 })
        ));
    }

    #[test]
    fn test_empty_scores_fail() {
        let raw = response(json!({ "displayNames": ["Beagle"], "confidences": [] }));
        assert!(matches!(
            reconcile(&raw, &catalog(), 5),
            Err(ReconciliationError::EmptyScores)
        ));
    }

    #[test]
    fn test_length_mismatch_never_ranks_partially() {
        let raw = response(json!({
            "displayNames": ["Beagle", "Pug"],
            "confidences": [0.9]
        }));
        assert!(matches!(
            reconcile(&raw, &catalog(), 5),
            Err(ReconciliationError::LengthMismatch { labels: 2, scores: 1 })
        ));
    }

    #[test]
    fn test_no_predictions_fails() {
        let raw: RawPredictionResponse =
            serde_json::from_value(json!({ "predictions": [] })).unwrap();
        assert!(matches!(
            reconcile(&raw, &catalog(), 5),
            Err(ReconciliationError::NoPredictions)
        ));
    }

    #[test]
    fn test_unrecognized_shape_carries_raw_payload() {
        let raw = response(json!({ "verdict": "dog" }));
        match reconcile(&raw, &catalog(), 5) {
            Err(ReconciliationError::UnrecognizedShape { raw }) => {
                assert_eq!(raw, json!({ "verdict": "dog" }));
            }
            other => panic!("expected UnrecognizedShape, got {other:?}"),
        }
    }

    #[test]
    fn test_top_k_len_is_min_of_n_and_k() {
        for (n, k) in [(1usize, 5usize), (5, 5), (8, 5), (3, 1)] {
            let labels: Vec<String> = (0..n).map(|i| format!("breed-{i}")).collect();
            let scores: Vec<f64> = (0..n).map(|i| (i as f64 + 1.0) / (n as f64 + 1.0)).collect();
            let raw = response(json!({ "displayNames": labels, "confidences": scores.clone() }));

            let ranked = reconcile(&raw, &catalog(), k).unwrap();
            assert_eq!(ranked.top_k.len(), n.min(k));

            let max = scores.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(ranked.top_k[0].confidence, max);
            for pair in ranked.top_k.windows(2) {
                assert!(pair[0].confidence >= pair[1].confidence);
            }
        }
    }
}
