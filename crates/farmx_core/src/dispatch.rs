//! Prediction dispatch
//!
//! Selects the scaler/predictor pair for a target, scales the raw inputs,
//! quantizes them and runs inference. Inputs are not range-checked here;
//! callers validate them beforehand. Dispatch is a pure function of the
//! inputs and the loaded store.

use crate::errors::{AdvisorError, Result};
use crate::features::{quantize, NutrientInputs, YieldInputs};
use crate::predictor::Prediction;
use crate::store::{ModelStore, Target};
use serde::Serialize;

/// All nutrient predictions for one input tuple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientReport {
    pub n_category: String,
    pub p_category: String,
    pub k_category: String,
    /// Recommended nitrogen (kg/ha)
    pub n_value: f64,
}

impl ModelStore {
    /// Scale `raw`, run the predictor for `target` and return its output.
    pub fn predict(&self, target: Target, raw: &[f64]) -> Result<Prediction> {
        let pair = self.pair(target).ok_or_else(|| AdvisorError::InvalidArtifact {
            name: target.to_string(),
            reason: "missing from store".to_string(),
        })?;

        let scaled = pair.scaler.transform(raw)?;
        let features = quantize(&scaled)?;
        pair.predictor.predict(&features)
    }

    /// Projected yield (kg), never negative.
    pub fn predict_yield(&self, inputs: &YieldInputs) -> Result<f64> {
        self.value(Target::Yield, &inputs.to_vector())
    }

    pub fn predict_nutrients(&self, inputs: &NutrientInputs) -> Result<NutrientReport> {
        let raw = inputs.to_vector();
        Ok(NutrientReport {
            n_category: self.category(Target::NCategory, &raw)?,
            p_category: self.category(Target::PCategory, &raw)?,
            k_category: self.category(Target::KCategory, &raw)?,
            n_value: self.value(Target::NValue, &raw)?,
        })
    }

    fn category(&self, target: Target, raw: &[f64]) -> Result<String> {
        match self.predict(target, raw)? {
            Prediction::Category(label) => Ok(label),
            Prediction::Value(_) => Err(AdvisorError::WrongOutput {
                target,
                expected: "category",
            }),
        }
    }

    fn value(&self, target: Target, raw: &[f64]) -> Result<f64> {
        match self.predict(target, raw)? {
            // A negative mass is not a usable recommendation.
            Prediction::Value(value) => Ok(value.max(0.0)),
            Prediction::Category(_) => Err(AdvisorError::WrongOutput {
                target,
                expected: "value",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn raw_dispatch_checks_width() {
        let store = demo::demo_store().unwrap();
        let err = store.predict(Target::Yield, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::FeatureMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn non_finite_input_fails_without_panicking() {
        let store = demo::demo_store().unwrap();
        let inputs = NutrientInputs {
            humidity: f64::NAN,
            temperature: 25.0,
            rainfall: 200.0,
            ph: 6.5,
            crop_id: 2,
        };
        assert!(matches!(
            store.predict_nutrients(&inputs),
            Err(AdvisorError::NonFiniteFeature { index: 0 })
        ));
    }

    #[test]
    fn overflowing_scaled_input_saturates() {
        let store = demo::demo_store().unwrap();
        let inputs = YieldInputs {
            grain_weight: f64::MAX,
            grain_moisture: 12.0,
            harvested_area: f64::MAX,
            crop_id: 1,
        };
        let first = store.predict_yield(&inputs).unwrap();
        assert!(first >= 0.0);
        assert_eq!(first, store.predict_yield(&inputs).unwrap());
    }

    #[test]
    fn category_targets_return_labels() {
        let store = demo::demo_store().unwrap();
        let raw = [80.0, 25.0, 200.0, 6.5, 2.0];
        for target in [Target::NCategory, Target::PCategory, Target::KCategory] {
            let prediction = store.predict(target, &raw).unwrap();
            let label = prediction.as_category().unwrap();
            assert!(demo::LABELS.contains(&label), "{target}: {label}");
        }
        assert!(store.predict(Target::NValue, &raw).unwrap().as_value().is_some());
    }
}
