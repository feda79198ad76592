//! Fitted feature scalers
//!
//! Scalers are fitted offline together with their models. The parameters
//! are read from the artifact and applied as-is.

use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of features this scaler was fitted on
    pub fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let (offsets, scale) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, scale } => (min, scale),
        };
        if offsets.is_empty() {
            return Err("scaler has no features".to_string());
        }
        if offsets.len() != scale.len() {
            return Err(format!(
                "scaler has {} offsets but {} scale factors",
                offsets.len(),
                scale.len()
            ));
        }
        if offsets.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        Ok(())
    }

    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.width() {
            return Err(AdvisorError::FeatureMismatch {
                expected: self.width(),
                actual: raw.len(),
            });
        }

        let scaled = match self {
            Scaler::Standard { mean, scale } => raw
                .iter()
                .zip(mean)
                .zip(scale)
                // A zero-variance column is only centred.
                .map(|((x, m), s)| if *s == 0.0 { x - m } else { (x - m) / s })
                .collect(),
            Scaler::MinMax { min, scale } => raw
                .iter()
                .zip(min)
                .zip(scale)
                .map(|((x, m), s)| x * s + m)
                .collect(),
        };
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scaling() {
        let scaler = Scaler::Standard {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 0.0],
        };
        assert_eq!(scaler.transform(&[14.0, 3.0]).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn min_max_scaling() {
        let scaler = Scaler::MinMax {
            min: vec![-1.0],
            scale: vec![0.01],
        };
        let out = scaler.transform(&[150.0]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn width_mismatch_is_reported() {
        let scaler = Scaler::Standard {
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        };
        let err = scaler.transform(&[1.0; 4]).unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::FeatureMismatch {
                expected: 5,
                actual: 4
            }
        ));
    }

    #[test]
    fn parses_tagged_json() {
        let scaler: Scaler =
            serde_json::from_str(r#"{"kind":"standard","mean":[1.0],"scale":[2.0]}"#).unwrap();
        assert_eq!(scaler.width(), 1);
        assert!(scaler.validate().is_ok());

        let lopsided = Scaler::MinMax {
            min: vec![0.0, 1.0],
            scale: vec![1.0],
        };
        assert!(lopsided.validate().is_err());
    }
}
