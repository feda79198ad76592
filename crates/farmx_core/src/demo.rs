//! Demonstration artifact set
//!
//! A small hand-built store with the same shape as the production
//! artifacts. `farmx-models write-demo` writes it to disk so the server can
//! run without the trained models; tests and benches use it as a fixture.
//! Its predictions are illustrative only.

use crate::errors::Result;
use crate::gbdt::{Model, Node, Tree, SCALE};
use crate::predictor::Predictor;
use crate::scaler::Scaler;
use crate::store::{ArtifactPair, ModelStore, Target};

/// Category labels used by the demo classifiers, in class order
pub const LABELS: [&str; 3] = ["Low", "Medium", "High"];

fn fx(value: f64) -> i64 {
    (value * SCALE as f64).round() as i64
}

fn stump(feature: i32, threshold: f64, left: f64, right: f64) -> Tree {
    Tree::new(
        vec![
            Node::internal(0, feature, fx(threshold), 1, 2),
            Node::leaf(1, fx(left)),
            Node::leaf(2, fx(right)),
        ],
        SCALE,
    )
}

fn with_weight(mut tree: Tree, weight: i64) -> Tree {
    tree.weight = weight;
    tree
}

fn nutrient_scaler() -> Scaler {
    Scaler::Standard {
        mean: vec![71.5, 25.6, 103.5, 6.47, 11.5],
        scale: vec![22.3, 5.1, 54.9, 0.77, 6.34],
    }
}

fn classifier(classes: [Tree; 3]) -> Predictor {
    Predictor::Classifier {
        n_features: 5,
        labels: LABELS.iter().map(|l| l.to_string()).collect(),
        classes: classes
            .into_iter()
            .map(|tree| Model::new(vec![tree], 0))
            .collect(),
    }
}

fn yield_pair() -> ArtifactPair {
    let half = SCALE / 2;
    let by_weight_and_area = Tree::new(
        vec![
            Node::internal(0, 0, 0, 1, 4),
            Node::internal(1, 2, 0, 2, 3),
            Node::leaf(2, fx(1800.0)),
            Node::leaf(3, fx(3200.0)),
            Node::internal(4, 2, 0, 5, 6),
            Node::leaf(5, fx(3600.0)),
            Node::leaf(6, fx(6400.0)),
        ],
        half,
    );
    let by_moisture = Tree::new(
        vec![
            Node::internal(0, 1, fx(0.5), 1, 4),
            Node::internal(1, 0, fx(-1.0), 2, 3),
            Node::leaf(2, fx(2000.0)),
            Node::leaf(3, fx(4200.0)),
            Node::leaf(4, fx(2400.0)),
        ],
        half,
    );

    ArtifactPair::new(
        Scaler::Standard {
            mean: vec![50.0, 14.0, 2.0, 11.5],
            scale: vec![25.0, 4.0, 1.5, 6.34],
        },
        Predictor::Regressor {
            n_features: 4,
            model: Model::new(vec![by_weight_and_area, by_moisture], 0),
        },
    )
}

fn n_value_pair() -> ArtifactPair {
    let half = SCALE / 2;
    let by_humidity_and_crop = Tree::new(
        vec![
            Node::internal(0, 0, 0, 1, 4),
            Node::internal(1, 4, 0, 2, 3),
            Node::leaf(2, fx(55.0)),
            Node::leaf(3, fx(80.0)),
            Node::leaf(4, fx(110.0)),
        ],
        half,
    );

    ArtifactPair::new(
        nutrient_scaler(),
        Predictor::Regressor {
            n_features: 5,
            model: Model::new(
                vec![
                    with_weight(stump(2, 0.0, 40.0, 95.0), half),
                    by_humidity_and_crop,
                ],
                0,
            ),
        },
    )
}

/// Every demo pair keyed by target
pub fn demo_pairs() -> Vec<(Target, ArtifactPair)> {
    vec![
        (Target::Yield, yield_pair()),
        (
            Target::NCategory,
            ArtifactPair::new(
                nutrient_scaler(),
                classifier([
                    stump(0, -0.5, 0.8, -0.2),
                    stump(2, 0.5, 0.5, 0.1),
                    stump(2, 0.5, 0.0, 0.9),
                ]),
            ),
        ),
        (
            Target::PCategory,
            ArtifactPair::new(
                nutrient_scaler(),
                classifier([
                    stump(3, -0.5, 0.9, 0.0),
                    stump(1, 0.5, 0.6, 0.2),
                    stump(3, 0.8, 0.1, 0.7),
                ]),
            ),
        ),
        (
            Target::KCategory,
            ArtifactPair::new(
                nutrient_scaler(),
                classifier([
                    stump(4, -0.5, 0.7, 0.1),
                    stump(0, 0.0, 0.4, 0.3),
                    stump(4, 0.8, 0.2, 0.9),
                ]),
            ),
        ),
        (Target::NValue, n_value_pair()),
    ]
}

pub fn demo_store() -> Result<ModelStore> {
    ModelStore::from_pairs(demo_pairs())
}
