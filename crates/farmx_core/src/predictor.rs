//! Predictor artifacts: regressors and classifiers over tree ensembles

use crate::errors::{AdvisorError, Result};
use crate::gbdt::Model;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predictor {
    /// Single ensemble; the output is its score at `post_scale`.
    Regressor { n_features: usize, model: Model },
    /// One ensemble per label; the highest score wins.
    Classifier {
        n_features: usize,
        labels: Vec<String>,
        classes: Vec<Model>,
    },
}

/// Output of one predictor call
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Category(String),
    Value(f64),
}

impl Prediction {
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Prediction::Category(label) => Some(label),
            Prediction::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<f64> {
        match self {
            Prediction::Value(value) => Some(*value),
            Prediction::Category(_) => None,
        }
    }
}

impl Predictor {
    pub fn n_features(&self) -> usize {
        match self {
            Predictor::Regressor { n_features, .. } | Predictor::Classifier { n_features, .. } => {
                *n_features
            }
        }
    }

    pub fn is_classifier(&self) -> bool {
        matches!(self, Predictor::Classifier { .. })
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let models: Vec<&Model> = match self {
            Predictor::Regressor { model, .. } => vec![model],
            Predictor::Classifier {
                labels, classes, ..
            } => {
                if labels.len() < 2 {
                    return Err(format!("classifier needs at least 2 labels, has {}", labels.len()));
                }
                if labels.len() != classes.len() {
                    return Err(format!(
                        "classifier has {} labels but {} class ensembles",
                        labels.len(),
                        classes.len()
                    ));
                }
                classes.iter().collect()
            }
        };

        for (i, model) in models.into_iter().enumerate() {
            model.validate().map_err(|e| format!("ensemble {i}: {e}"))?;
            if model.feature_count() > self.n_features() {
                return Err(format!(
                    "ensemble {i} reads feature {} but the predictor takes {}",
                    model.feature_count() - 1,
                    self.n_features()
                ));
            }
        }
        Ok(())
    }

    /// Run inference on a quantized feature vector.
    pub fn predict(&self, features: &[i64]) -> Result<Prediction> {
        if features.len() != self.n_features() {
            return Err(AdvisorError::FeatureMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }

        match self {
            Predictor::Regressor { model, .. } => Ok(Prediction::Value(model.score_f64(features)?)),
            Predictor::Classifier {
                labels, classes, ..
            } => {
                let mut best: Option<(usize, i64)> = None;
                for (i, class) in classes.iter().enumerate() {
                    let score = class.score(features)?;
                    // Strict comparison keeps the lowest index on ties.
                    if best.map_or(true, |(_, top)| score > top) {
                        best = Some((i, score));
                    }
                }
                let (idx, _) = best.ok_or_else(|| AdvisorError::InvalidArtifact {
                    name: "classifier".to_string(),
                    reason: "no class ensembles".to_string(),
                })?;
                Ok(Prediction::Category(labels[idx].clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::{Node, Tree, SCALE};

    fn stump(feature: i32, low: i64, high: i64) -> Model {
        Model::new(
            vec![Tree::new(
                vec![
                    Node::internal(0, feature, 0, 1, 2),
                    Node::leaf(1, low),
                    Node::leaf(2, high),
                ],
                SCALE,
            )],
            0,
        )
    }

    fn classifier() -> Predictor {
        Predictor::Classifier {
            n_features: 2,
            labels: vec!["Low".into(), "High".into()],
            classes: vec![stump(0, SCALE, 0), stump(0, 0, SCALE)],
        }
    }

    #[test]
    fn regressor_returns_value() {
        let predictor = Predictor::Regressor {
            n_features: 1,
            model: stump(0, 2 * SCALE, 7 * SCALE),
        };
        assert_eq!(predictor.predict(&[SCALE]).unwrap(), Prediction::Value(7.0));
        assert_eq!(predictor.predict(&[-SCALE]).unwrap().as_value(), Some(2.0));
    }

    #[test]
    fn classifier_picks_highest_score() {
        let predictor = classifier();
        assert_eq!(
            predictor.predict(&[-SCALE, 0]).unwrap().as_category(),
            Some("Low")
        );
        assert_eq!(
            predictor.predict(&[SCALE, 0]).unwrap().as_category(),
            Some("High")
        );
    }

    #[test]
    fn classifier_ties_go_to_first_label() {
        let predictor = Predictor::Classifier {
            n_features: 1,
            labels: vec!["Medium".into(), "High".into()],
            classes: vec![stump(0, SCALE, SCALE), stump(0, SCALE, SCALE)],
        };
        assert_eq!(
            predictor.predict(&[0]).unwrap(),
            Prediction::Category("Medium".into())
        );
    }

    #[test]
    fn wrong_width_is_rejected() {
        assert!(matches!(
            classifier().predict(&[0]),
            Err(AdvisorError::FeatureMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn validation_checks_labels_and_features() {
        assert!(classifier().validate().is_ok());

        let mismatched = Predictor::Classifier {
            n_features: 2,
            labels: vec!["Low".into(), "Medium".into(), "High".into()],
            classes: vec![stump(0, 0, 1), stump(0, 1, 0)],
        };
        assert!(mismatched.validate().is_err());

        let too_narrow = Predictor::Regressor {
            n_features: 1,
            model: stump(3, 0, 1),
        };
        assert!(too_narrow.validate().is_err());
    }

    #[test]
    fn parses_tagged_json() {
        let json = serde_json::json!({
            "kind": "regressor",
            "n_features": 1,
            "model": stump(0, 1, 2),
        });
        let predictor: Predictor = serde_json::from_value(json).unwrap();
        assert!(!predictor.is_classifier());
        assert_eq!(predictor.n_features(), 1);
    }
}
