//! Prediction response parsing.
//!
//! The endpoint's field names vary across deployments:
//! `displayNames`/`confidences`, `classes`/`scores`, or a bare score array
//! whose positions refer to the label catalog. Parsing resolves a raw
//! prediction into one tagged [`PredictionShape`]; anything else is
//! `Unrecognized` and fails loudly downstream instead of passing through.

use serde::Deserialize;
use serde_json::Value;

/// Unparsed body of a prediction call.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPredictionResponse {
    /// Prediction instances; only the first is consulted
    #[serde(default)]
    pub predictions: Vec<Value>,
}

/// Field-name conventions a raw prediction may use.
#[derive(Debug, Deserialize)]
struct RawPrediction {
    #[serde(rename = "displayNames")]
    display_names: Option<Vec<String>>,
    classes: Option<Vec<String>>,
    confidences: Option<Vec<f64>>,
    scores: Option<Vec<f64>>,
}

/// A raw prediction resolved to one known shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionShape {
    /// Labels paired with scores, whichever field names carried them
    Labeled {
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    /// Scores only; labels resolve through the catalog by index
    ScoresOnly { scores: Vec<f64> },
    /// No recognizable label/score fields; the raw value is kept for the error
    Unrecognized(Value),
}

impl PredictionShape {
    /// Classify one raw prediction instance.
    pub fn classify(raw: &Value) -> Self {
        let Ok(parsed) = serde_json::from_value::<RawPrediction>(raw.clone()) else {
            return Self::Unrecognized(raw.clone());
        };

        let labels = parsed.display_names.or(parsed.classes);
        let scores = parsed.confidences.or(parsed.scores);

        match (labels, scores) {
            (Some(labels), Some(scores)) => Self::Labeled { labels, scores },
            (None, Some(scores)) => Self::ScoresOnly { scores },
            _ => Self::Unrecognized(raw.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_display_names_confidences() {
        let shape = PredictionShape::classify(&json!({
            "displayNames": ["Beagle", "Pug"],
            "confidences": [0.6, 0.4]
        }));
        assert_eq!(
            shape,
            PredictionShape::Labeled {
                labels: vec!["Beagle".into(), "Pug".into()],
                scores: vec![0.6, 0.4],
            }
        );
    }

    #[test]
    fn test_classify_classes_scores() {
        let shape = PredictionShape::classify(&json!({
            "classes": ["Beagle"],
            "scores": [0.8]
        }));
        assert_eq!(
            shape,
            PredictionShape::Labeled {
                labels: vec!["Beagle".into()],
                scores: vec![0.8],
            }
        );
    }

    #[test]
    fn test_classify_scores_only() {
        let shape = PredictionShape::classify(&json!({ "scores": [0.1, 0.9] }));
        assert_eq!(
            shape,
            PredictionShape::ScoresOnly {
                scores: vec![0.1, 0.9]
            }
        );
    }

    #[test]
    fn test_classify_unrecognized_payload() {
        let raw = json!({ "summary": "a nice dog" });
        assert_eq!(
            PredictionShape::classify(&raw),
            PredictionShape::Unrecognized(raw)
        );
    }

    #[test]
    fn test_classify_wrongly_typed_fields_fail_loudly() {
        let raw = json!({ "displayNames": "Beagle", "confidences": [0.6] });
        assert!(matches!(
            PredictionShape::classify(&raw),
            PredictionShape::Unrecognized(_)
        ));
    }

    #[test]
    fn test_labels_without_scores_is_unrecognized() {
        let raw = json!({ "displayNames": ["Beagle"] });
        assert!(matches!(
            PredictionShape::classify(&raw),
            PredictionShape::Unrecognized(_)
        ));
    }

    #[test]
    fn test_response_without_predictions_parses_empty() {
        let raw: RawPredictionResponse =
            serde_json::from_value(json!({ "deployedModelId": "123" })).unwrap();
        assert!(raw.predictions.is_empty());
    }
}
