//! Tree ensemble with fixed-point inference
//!
//! An ensemble sums `leaf * tree.weight / scale` over its trees and adds
//! `bias`. The result is a fixed-point integer at `post_scale`.

use super::tree::Tree;
use crate::serde_canon::{hash_canonical_hex, to_canonical_json, CanonicalError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tree {tree} could not be evaluated on {features} features")]
    Traversal { tree: usize, features: usize },

    #[error("Score overflowed in tree {0}")]
    Overflow(usize),

    #[error("Canonical serialization error: {0}")]
    CanonicalError(#[from] CanonicalError),
}

/// Default fixed-point scale (1e6)
pub const SCALE: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Format version, always 1
    pub version: i32,

    /// Fixed-point scale of thresholds, leaves and weights
    pub scale: i64,

    pub trees: Vec<Tree>,

    /// Bias term (fixed-point)
    pub bias: i64,

    /// Scale of the returned score
    pub post_scale: i64,
}

impl Model {
    pub fn new(trees: Vec<Tree>, bias: i64) -> Self {
        Self::with_scale(trees, bias, SCALE, SCALE)
    }

    pub fn with_scale(trees: Vec<Tree>, bias: i64, scale: i64, post_scale: i64) -> Self {
        Self {
            version: 1,
            scale,
            trees,
            bias,
            post_scale,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != 1 {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }
        if self.scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid scale: {}",
                self.scale
            )));
        }
        if self.post_scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid post_scale: {}",
                self.post_scale
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed("Model has no trees".into()));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {i} validation failed: {e}"))
            })?;
        }

        Ok(())
    }

    /// Score a fixed-point feature vector.
    pub fn score(&self, features: &[i64]) -> Result<i64, ModelError> {
        let mut sum = i128::from(self.bias);

        for (i, tree) in self.trees.iter().enumerate() {
            let leaf = tree.evaluate(features).ok_or(ModelError::Traversal {
                tree: i,
                features: features.len(),
            })?;
            let contribution = i128::from(leaf) * i128::from(tree.weight) / i128::from(self.scale);
            sum = sum.checked_add(contribution).ok_or(ModelError::Overflow(i))?;
        }

        i64::try_from(sum).map_err(|_| ModelError::Overflow(self.trees.len()))
    }

    /// Score and convert to a float at `post_scale`.
    pub fn score_f64(&self, features: &[i64]) -> Result<f64, ModelError> {
        Ok(self.score(features)? as f64 / self.post_scale as f64)
    }

    /// Number of features the splits read (highest index + 1).
    pub fn feature_count(&self) -> usize {
        self.trees
            .iter()
            .filter_map(Tree::max_feature_index)
            .max()
            .map_or(0, |idx| idx + 1)
    }

    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(hash_canonical_hex(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::tree::Node;

    fn create_test_model() -> Model {
        let tree1 = Tree::new(
            vec![
                Node::internal(0, 0, 50 * SCALE, 1, 2),
                Node::leaf(1, 100 * SCALE),
                Node::leaf(2, 200 * SCALE),
            ],
            SCALE,
        );

        let tree2 = Tree::new(
            vec![
                Node::internal(0, 1, 30 * SCALE, 1, 2),
                Node::leaf(1, -50 * SCALE),
                Node::leaf(2, 50 * SCALE),
            ],
            SCALE,
        );

        Model::new(vec![tree1, tree2], 0)
    }

    #[test]
    fn test_model_inference() {
        let model = create_test_model();
        // tree1 left (100) + tree2 left (-50)
        let score = model.score(&[30 * SCALE, 20 * SCALE]).unwrap();
        assert_eq!(score, 50 * SCALE);
        // tree1 right (200) + tree2 right (50)
        let score = model.score(&[60 * SCALE, 40 * SCALE]).unwrap();
        assert_eq!(score, 250 * SCALE);
    }

    #[test]
    fn test_score_f64_uses_post_scale() {
        let model = create_test_model();
        let value = model.score_f64(&[30 * SCALE, 20 * SCALE]).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_of_trees() {
        // Two trees at half weight behave like a forest mean.
        let half = SCALE / 2;
        let model = Model::new(
            vec![
                Tree::new(vec![Node::leaf(0, 10 * SCALE)], half),
                Tree::new(vec![Node::leaf(0, 30 * SCALE)], half),
            ],
            0,
        );
        assert_eq!(model.score(&[]).unwrap(), 20 * SCALE);
    }

    #[test]
    fn test_bias_is_added() {
        let model = Model::new(vec![Tree::new(vec![Node::leaf(0, 100)], SCALE)], 500);
        assert_eq!(model.score(&[]).unwrap(), 600);
    }

    #[test]
    fn test_short_feature_vector_is_an_error() {
        let model = create_test_model();
        let err = model.score(&[SCALE]).unwrap_err();
        assert!(matches!(err, ModelError::Traversal { tree: 1, features: 1 }));
    }

    #[test]
    fn test_feature_count() {
        assert_eq!(create_test_model().feature_count(), 2);
    }

    #[test]
    fn test_hash_deterministic_and_sensitive() {
        let hash1 = create_test_model().hash_hex().unwrap();
        let hash2 = create_test_model().hash_hex().unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        let mut changed = create_test_model();
        changed.bias = 1;
        assert_ne!(hash1, changed.hash_hex().unwrap());
    }

    #[test]
    fn test_canonical_json_roundtrip() {
        let original = create_test_model();
        let json = original.to_canonical_json().unwrap();
        assert!(!json.contains('\n'));
        let restored: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_model_validation() {
        assert!(create_test_model().validate().is_ok());

        let mut invalid = create_test_model();
        invalid.scale = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = create_test_model();
        invalid.version = 999;
        assert!(invalid.validate().is_err());

        assert!(Model::new(vec![], 0).validate().is_err());
    }
}
