//! Decision tree structures for ensemble inference
//!
//! Thresholds and leaf values are fixed-point integers at the owning
//! ensemble's `scale`. Traversal compares with `<=` and goes left on equality.

use serde::{Deserialize, Serialize};

/// A decision tree node (split or leaf)
///
/// Split nodes carry a feature index, a threshold and two child indices.
/// Leaf nodes carry `feature_idx == -1` and a `leaf` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    /// Node ID (informational, traversal uses positions)
    pub id: i32,

    /// Left child position (-1 for leaves)
    pub left: i32,

    /// Right child position (-1 for leaves)
    pub right: i32,

    /// Feature index to split on (-1 for leaves)
    #[serde(rename = "feature_idx", alias = "feature")]
    pub feature_idx: i32,

    /// Split threshold (fixed-point)
    pub threshold: i64,

    /// Leaf value (fixed-point)
    pub leaf: Option<i64>,
}

impl Node {
    /// Create a split node
    pub fn internal(id: i32, feature_idx: i32, threshold: i64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            leaf: None,
        }
    }

    /// Create a leaf node
    pub fn leaf(id: i32, value: i64) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx < 0 || self.leaf.is_some()
    }
}

/// A single decision tree. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tree {
    pub nodes: Vec<Node>,

    /// Weight applied to this tree's leaf value when summing the ensemble
    pub weight: i64,
}

impl Tree {
    pub fn new(nodes: Vec<Node>, weight: i64) -> Self {
        Self { nodes, weight }
    }

    /// Walk the tree for `features` and return the reached leaf value.
    ///
    /// Returns `None` when the walk leaves the node table, reads a feature
    /// past the end of `features`, or takes more steps than there are nodes.
    pub fn evaluate(&self, features: &[i64]) -> Option<i64> {
        let mut idx = 0usize;

        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx)?;
            if node.is_leaf() {
                return node.leaf;
            }

            let value = *features.get(usize::try_from(node.feature_idx).ok()?)?;
            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            idx = usize::try_from(next).ok()?;
        }

        None
    }

    /// Highest feature index referenced by a split, if any.
    pub fn max_feature_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter(|node| !node.is_leaf())
            .filter_map(|node| usize::try_from(node.feature_idx).ok())
            .max()
    }

    /// Check child links, split features and leaf values.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let in_range = |child: i32| child >= 0 && (child as usize) < self.nodes.len();

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.leaf.is_none() {
                    return Err(format!("leaf node {i} has no leaf value"));
                }
                continue;
            }
            if !in_range(node.left) {
                return Err(format!("node {i} has invalid left child: {}", node.left));
            }
            if !in_range(node.right) {
                return Err(format!("node {i} has invalid right child: {}", node.right));
            }
            // Children must sit after their parent, which rules out cycles.
            if node.left as usize <= i || node.right as usize <= i {
                return Err(format!("node {i} links backwards"));
            }
        }

        Ok(())
    }
}
