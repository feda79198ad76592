//! Feature vectors for the yield and nutrient models
//!
//! The field order of each `to_vector` is the column order the models were
//! trained with.

use crate::errors::{AdvisorError, Result};
use crate::gbdt::SCALE;
use serde::{Deserialize, Serialize};

/// Raw yield inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldInputs {
    /// Grain weight (kg)
    pub grain_weight: f64,
    /// Grain moisture (%)
    pub grain_moisture: f64,
    /// Harvested area (ha)
    pub harvested_area: f64,
    pub crop_id: u8,
}

impl YieldInputs {
    pub const WIDTH: usize = 4;

    pub fn to_vector(&self) -> [f64; Self::WIDTH] {
        [
            self.grain_weight,
            self.grain_moisture,
            self.harvested_area,
            f64::from(self.crop_id),
        ]
    }
}

/// Raw soil and weather inputs for the N/P/K models
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientInputs {
    /// Relative humidity (%)
    pub humidity: f64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
    /// Soil pH
    pub ph: f64,
    pub crop_id: u8,
}

impl NutrientInputs {
    pub const WIDTH: usize = 5;

    pub fn to_vector(&self) -> [f64; Self::WIDTH] {
        [
            self.humidity,
            self.temperature,
            self.rainfall,
            self.ph,
            f64::from(self.crop_id),
        ]
    }
}

/// Convert scaled features to fixed-point integers at [`SCALE`].
///
/// Values beyond the i64 range, infinities included, saturate at
/// `i64::MIN`/`i64::MAX`. Only NaN is rejected.
pub fn quantize(scaled: &[f64]) -> Result<Vec<i64>> {
    scaled
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if value.is_nan() {
                Err(AdvisorError::NonFiniteFeature { index })
            } else {
                Ok((value * SCALE as f64).round() as i64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutrient_vector_order() {
        let inputs = NutrientInputs {
            humidity: 80.0,
            temperature: 25.0,
            rainfall: 200.0,
            ph: 6.5,
            crop_id: 2,
        };
        assert_eq!(inputs.to_vector(), [80.0, 25.0, 200.0, 6.5, 2.0]);
    }

    #[test]
    fn yield_vector_order() {
        let inputs = YieldInputs {
            grain_weight: 50.0,
            grain_moisture: 12.0,
            harvested_area: 1.0,
            crop_id: 1,
        };
        assert_eq!(inputs.to_vector(), [50.0, 12.0, 1.0, 1.0]);
    }

    #[test]
    fn quantize_rounds_to_scale() {
        assert_eq!(
            quantize(&[1.5, -0.25, 0.0000004]).unwrap(),
            vec![1_500_000, -250_000, 0]
        );
    }

    #[test]
    fn quantize_rejects_nan() {
        let err = quantize(&[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, AdvisorError::NonFiniteFeature { index: 1 }));
    }

    #[test]
    fn quantize_saturates_out_of_range_values() {
        assert_eq!(
            quantize(&[f64::INFINITY, f64::NEG_INFINITY, 1e300, -1e300]).unwrap(),
            vec![i64::MAX, i64::MIN, i64::MAX, i64::MIN]
        );
    }
}
