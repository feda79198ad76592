//! Model store
//!
//! Holds one scaler/predictor pair per [`Target`]. The store is built once
//! at startup and shared read-only; there is no write path after loading.

use crate::errors::{AdvisorError, Result};
use crate::features::{NutrientInputs, YieldInputs};
use crate::predictor::Predictor;
use crate::scaler::Scaler;
use crate::serde_canon::hash_canonical_hex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prediction targets served by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Yield,
    NCategory,
    PCategory,
    KCategory,
    NValue,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Yield,
        Target::NCategory,
        Target::PCategory,
        Target::KCategory,
        Target::NValue,
    ];

    /// Artifact file names `(scaler, predictor)` inside the models directory
    pub fn file_names(self) -> (&'static str, &'static str) {
        match self {
            Target::Yield => ("scaler_yield.json", "rf_yield_regressor.json"),
            Target::NCategory => ("scaler_n_category.json", "gb_n_category_classifier.json"),
            Target::PCategory => ("scaler_p_category.json", "rf_p_category_classifier.json"),
            Target::KCategory => ("scaler_k_category.json", "rf_k_category_classifier.json"),
            Target::NValue => ("scaler_n.json", "rf_n_regressor.json"),
        }
    }

    /// Width of the raw feature vector this target consumes
    pub fn input_width(self) -> usize {
        match self {
            Target::Yield => YieldInputs::WIDTH,
            _ => NutrientInputs::WIDTH,
        }
    }

    /// Whether the target yields a label rather than a number
    pub fn is_category(self) -> bool {
        matches!(self, Target::NCategory | Target::PCategory | Target::KCategory)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Yield => "yield",
            Target::NCategory => "n_category",
            Target::PCategory => "p_category",
            Target::KCategory => "k_category",
            Target::NValue => "n_value",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted scaler and the predictor trained on its output
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPair {
    pub scaler: Scaler,
    pub predictor: Predictor,
}

impl ArtifactPair {
    pub fn new(scaler: Scaler, predictor: Predictor) -> Self {
        Self { scaler, predictor }
    }

    /// Check the pair against the target it will serve.
    pub fn validate_for(&self, target: Target) -> Result<()> {
        let invalid = |reason: String| AdvisorError::InvalidArtifact {
            name: target.to_string(),
            reason,
        };

        self.scaler.validate().map_err(invalid)?;
        self.predictor.validate().map_err(invalid)?;

        let width = target.input_width();
        if self.scaler.width() != width {
            return Err(invalid(format!(
                "scaler takes {} features, target needs {width}",
                self.scaler.width()
            )));
        }
        if self.predictor.n_features() != width {
            return Err(invalid(format!(
                "predictor takes {} features, target needs {width}",
                self.predictor.n_features()
            )));
        }
        if self.predictor.is_classifier() != target.is_category() {
            return Err(invalid("predictor kind does not match the target".to_string()));
        }
        Ok(())
    }
}

/// Canonical fingerprint of one loaded artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHash {
    pub file: String,
    pub hash: String,
}

#[derive(Debug, Clone)]
pub struct ModelStore {
    pairs: BTreeMap<Target, ArtifactPair>,
    source: Option<PathBuf>,
}

impl ModelStore {
    /// Build a store from in-memory pairs. Every target must be present.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Target, ArtifactPair)>) -> Result<Self> {
        let pairs: BTreeMap<_, _> = pairs.into_iter().collect();
        for target in Target::ALL {
            let pair = pairs.get(&target).ok_or_else(|| AdvisorError::InvalidArtifact {
                name: target.to_string(),
                reason: "missing from store".to_string(),
            })?;
            pair.validate_for(target)?;
        }
        Ok(Self {
            pairs,
            source: None,
        })
    }

    /// Load every artifact pair from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut pairs = Vec::with_capacity(Target::ALL.len());

        for target in Target::ALL {
            let (scaler_file, predictor_file) = target.file_names();
            let scaler: Scaler = read_artifact(&dir.join(scaler_file))?;
            let predictor: Predictor = read_artifact(&dir.join(predictor_file))?;
            debug!(artifact = %target, scaler_file, predictor_file, "loaded artifact pair");
            pairs.push((target, ArtifactPair::new(scaler, predictor)));
        }

        let mut store = Self::from_pairs(pairs)?;
        store.source = Some(dir.to_path_buf());
        info!(dir = %dir.display(), targets = store.pairs.len(), "model store ready");
        Ok(store)
    }

    /// Write every pair as JSON files into `dir` (created if missing).
    pub fn write_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| AdvisorError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for (target, pair) in &self.pairs {
            let (scaler_file, predictor_file) = target.file_names();
            write_artifact(&dir.join(scaler_file), &pair.scaler)?;
            write_artifact(&dir.join(predictor_file), &pair.predictor)?;
        }
        Ok(())
    }

    pub fn pair(&self, target: Target) -> Option<&ArtifactPair> {
        self.pairs.get(&target)
    }

    /// Directory the store was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of artifact files backing the store
    pub fn artifact_count(&self) -> usize {
        self.pairs.len() * 2
    }

    /// Canonical hashes for every artifact, in target order.
    pub fn artifact_hashes(&self) -> Result<Vec<ArtifactHash>> {
        let mut hashes = Vec::with_capacity(self.artifact_count());
        for (target, pair) in &self.pairs {
            let (scaler_file, predictor_file) = target.file_names();
            hashes.push(ArtifactHash {
                file: scaler_file.to_string(),
                hash: canonical_hash(scaler_file, &pair.scaler)?,
            });
            hashes.push(ArtifactHash {
                file: predictor_file.to_string(),
                hash: canonical_hash(predictor_file, &pair.predictor)?,
            });
        }
        Ok(hashes)
    }
}

fn canonical_hash<T: Serialize>(file: &str, value: &T) -> Result<String> {
    hash_canonical_hex(value).map_err(|e| AdvisorError::InvalidArtifact {
        name: file.to_string(),
        reason: e.to_string(),
    })
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| AdvisorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AdvisorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| AdvisorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn file_names_are_unique() {
        let mut names: Vec<&str> = Target::ALL
            .iter()
            .flat_map(|t| {
                let (a, b) = t.file_names();
                [a, b]
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn missing_target_is_rejected() {
        let pairs = demo::demo_pairs()
            .into_iter()
            .filter(|(target, _)| *target != Target::KCategory);
        let err = ModelStore::from_pairs(pairs).unwrap_err();
        assert!(err.to_string().contains("k_category"));
    }

    #[test]
    fn swapped_pair_kind_is_rejected() {
        let mut pairs: BTreeMap<_, _> = demo::demo_pairs().into_iter().collect();
        let regressor = pairs[&Target::NValue].clone();
        pairs.insert(Target::NCategory, regressor);
        let err = ModelStore::from_pairs(pairs).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidArtifact { .. }));
    }

    #[test]
    fn hashes_cover_every_artifact() {
        let store = demo::demo_store().unwrap();
        let hashes = store.artifact_hashes().unwrap();
        assert_eq!(hashes.len(), store.artifact_count());
        assert!(hashes.iter().all(|h| h.hash.len() == 64));
        assert_eq!(hashes, store.artifact_hashes().unwrap());
    }
}
