//! FarmX core: crop registry, model artifacts and prediction dispatch
//!
//! Modules:
//! - `crops`: static crop name to id registry
//! - `features`: raw input bundles and fixed-point quantization
//! - `scaler`: fitted feature scalers
//! - `gbdt`: fixed-point tree ensembles
//! - `predictor`: regressor and classifier artifacts
//! - `store`: the loaded, read-only set of artifact pairs
//! - `dispatch`: target selection and scale-then-predict
//! - `demo`: a small demonstration artifact set

pub mod crops;
pub mod demo;
pub mod dispatch;
pub mod errors;
pub mod features;
pub mod gbdt;
pub mod predictor;
pub mod scaler;
pub mod serde_canon;
pub mod store;

pub use crops::{crop_id, Crop};
pub use dispatch::NutrientReport;
pub use errors::{AdvisorError, Result};
pub use features::{NutrientInputs, YieldInputs};
pub use predictor::{Prediction, Predictor};
pub use scaler::Scaler;
pub use store::{ArtifactHash, ArtifactPair, ModelStore, Target};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
