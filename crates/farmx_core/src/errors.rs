//! Error types for artifact loading and prediction dispatch

use crate::gbdt::ModelError;
use crate::store::Target;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// An artifact file could not be read
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact file is not valid JSON for its kind
    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact parameters are inconsistent
    #[error("Invalid artifact {name}: {reason}")]
    InvalidArtifact { name: String, reason: String },

    /// Scaler or model received a vector of the wrong width
    #[error("Expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// Scaling produced NaN at this position
    #[error("Feature {index} is NaN after scaling")]
    NonFiniteFeature { index: usize },

    /// The target produces the other kind of output
    #[error("{target} does not produce a {expected}")]
    WrongOutput { target: Target, expected: &'static str },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
