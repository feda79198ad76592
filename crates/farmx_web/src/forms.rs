//! Form fields, submitted forms and their validation
//!
//! [`FieldSpec`] is used both to render `<input>` bounds and to check
//! submitted values, so the page and the server agree on the limits.
//! Values at exactly `min` or `max` are accepted.

use crate::errors::FormError;
use farmx_core::{crops, Crop, NutrientInputs, YieldInputs};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Form field name
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
    pub step: f64,
}

pub const GRAIN_WEIGHT: FieldSpec = FieldSpec {
    name: "grain_weight",
    label: "Grain Weight (kg)",
    min: 0.0,
    max: None,
    step: 0.1,
};

pub const GRAIN_MOISTURE: FieldSpec = FieldSpec {
    name: "grain_moisture",
    label: "Grain Moisture (%)",
    min: 0.0,
    max: Some(100.0),
    step: 0.1,
};

pub const HARVESTED_AREA: FieldSpec = FieldSpec {
    name: "harvested_area",
    label: "Harvested Area (ha)",
    min: 0.0,
    max: None,
    step: 0.01,
};

pub const TEMPERATURE: FieldSpec = FieldSpec {
    name: "temperature",
    label: "Temperature (°C)",
    min: -100.0,
    max: Some(100.0),
    step: 0.1,
};

pub const HUMIDITY: FieldSpec = FieldSpec {
    name: "humidity",
    label: "Humidity (%)",
    min: 0.0,
    max: Some(100.0),
    step: 0.1,
};

pub const SOIL_PH: FieldSpec = FieldSpec {
    name: "ph",
    label: "Soil pH",
    min: 0.0,
    max: Some(14.0),
    step: 0.1,
};

pub const RAINFALL: FieldSpec = FieldSpec {
    name: "rainfall",
    label: "Rainfall (mm)",
    min: 0.0,
    max: None,
    step: 0.1,
};

/// Yield fields in display order
pub const YIELD_FIELDS: [FieldSpec; 3] = [GRAIN_WEIGHT, GRAIN_MOISTURE, HARVESTED_AREA];

/// Nutrient fields in display order
pub const NUTRIENT_FIELDS: [FieldSpec; 4] = [TEMPERATURE, HUMIDITY, SOIL_PH, RAINFALL];

impl FieldSpec {
    /// Reject values outside `[min, max]` and non-finite values.
    pub fn check(&self, value: f64) -> Result<f64, FormError> {
        let above_max = self.max.is_some_and(|max| value > max);
        if !value.is_finite() || value < self.min || above_max {
            let bounds = match self.max {
                Some(max) => format!("between {:.2} and {:.2}", self.min, max),
                None => format!("at least {:.2}", self.min),
            };
            return Err(FormError::OutOfRange {
                label: self.label,
                bounds,
            });
        }
        Ok(value)
    }

    fn parse(&self, raw: &str) -> Result<f64, FormError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| FormError::NotANumber { label: self.label })
    }
}

fn filled(values: &[&str]) -> bool {
    values.iter().all(|v| !v.trim().is_empty())
}

fn lookup_crop(name: &str) -> Result<Crop, FormError> {
    crops::lookup(name.trim()).ok_or(FormError::InvalidCrop)
}

/// Validated yield submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidYield {
    pub crop: Crop,
    pub inputs: YieldInputs,
}

/// Validated nutrient submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidNutrients {
    pub crop: Crop,
    pub inputs: NutrientInputs,
}

/// Bounds-check typed yield values and resolve the crop.
pub fn build_yield(
    crop: &str,
    grain_weight: f64,
    grain_moisture: f64,
    harvested_area: f64,
) -> Result<ValidYield, FormError> {
    let grain_weight = GRAIN_WEIGHT.check(grain_weight)?;
    let grain_moisture = GRAIN_MOISTURE.check(grain_moisture)?;
    let harvested_area = HARVESTED_AREA.check(harvested_area)?;
    let crop = lookup_crop(crop)?;

    Ok(ValidYield {
        crop,
        inputs: YieldInputs {
            grain_weight,
            grain_moisture,
            harvested_area,
            crop_id: crop.id,
        },
    })
}

/// Bounds-check typed nutrient values and resolve the crop.
pub fn build_nutrients(
    crop: &str,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
) -> Result<ValidNutrients, FormError> {
    let temperature = TEMPERATURE.check(temperature)?;
    let humidity = HUMIDITY.check(humidity)?;
    let ph = SOIL_PH.check(ph)?;
    let rainfall = RAINFALL.check(rainfall)?;
    let crop = lookup_crop(crop)?;

    Ok(ValidNutrients {
        crop,
        inputs: NutrientInputs {
            humidity,
            temperature,
            rainfall,
            ph,
            crop_id: crop.id,
        },
    })
}

/// Single-crop yield form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct YieldForm {
    pub grain_weight: String,
    pub grain_moisture: String,
    pub harvested_area: String,
    pub crop: String,
}

impl YieldForm {
    fn is_filled(&self) -> bool {
        filled(&[
            &self.grain_weight,
            &self.grain_moisture,
            &self.harvested_area,
            &self.crop,
        ])
    }

    fn parse_filled(&self) -> Result<ValidYield, FormError> {
        build_yield(
            &self.crop,
            GRAIN_WEIGHT.parse(&self.grain_weight)?,
            GRAIN_MOISTURE.parse(&self.grain_moisture)?,
            HARVESTED_AREA.parse(&self.harvested_area)?,
        )
    }

    pub fn validate(&self) -> Result<ValidYield, FormError> {
        if !self.is_filled() {
            return Err(FormError::MissingFields);
        }
        self.parse_filled()
    }

    /// Submitted value for a field, for re-rendering the form
    pub fn value(&self, field: &FieldSpec) -> &str {
        match field.name {
            "grain_weight" => &self.grain_weight,
            "grain_moisture" => &self.grain_moisture,
            "harvested_area" => &self.harvested_area,
            _ => "",
        }
    }
}

/// Two-crop yield comparison form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompareYieldForm {
    pub crop1: String,
    pub grain_weight1: String,
    pub grain_moisture1: String,
    pub harvested_area1: String,
    pub crop2: String,
    pub grain_weight2: String,
    pub grain_moisture2: String,
    pub harvested_area2: String,
}

impl CompareYieldForm {
    pub fn sides(&self) -> [YieldForm; 2] {
        [
            YieldForm {
                grain_weight: self.grain_weight1.clone(),
                grain_moisture: self.grain_moisture1.clone(),
                harvested_area: self.harvested_area1.clone(),
                crop: self.crop1.clone(),
            },
            YieldForm {
                grain_weight: self.grain_weight2.clone(),
                grain_moisture: self.grain_moisture2.clone(),
                harvested_area: self.harvested_area2.clone(),
                crop: self.crop2.clone(),
            },
        ]
    }

    pub fn validate(&self) -> Result<[ValidYield; 2], FormError> {
        let [first, second] = self.sides();
        if !first.is_filled() || !second.is_filled() {
            return Err(FormError::MissingComparisonFields);
        }
        Ok([first.parse_filled()?, second.parse_filled()?])
    }
}

/// Single-crop nutrient form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NutrientForm {
    pub temperature: String,
    pub humidity: String,
    pub ph: String,
    pub rainfall: String,
    pub crop: String,
}

impl NutrientForm {
    fn is_filled(&self) -> bool {
        filled(&[
            &self.temperature,
            &self.humidity,
            &self.ph,
            &self.rainfall,
            &self.crop,
        ])
    }

    fn parse_filled(&self) -> Result<ValidNutrients, FormError> {
        build_nutrients(
            &self.crop,
            TEMPERATURE.parse(&self.temperature)?,
            HUMIDITY.parse(&self.humidity)?,
            SOIL_PH.parse(&self.ph)?,
            RAINFALL.parse(&self.rainfall)?,
        )
    }

    pub fn validate(&self) -> Result<ValidNutrients, FormError> {
        if !self.is_filled() {
            return Err(FormError::MissingFields);
        }
        self.parse_filled()
    }

    pub fn value(&self, field: &FieldSpec) -> &str {
        match field.name {
            "temperature" => &self.temperature,
            "humidity" => &self.humidity,
            "ph" => &self.ph,
            "rainfall" => &self.rainfall,
            _ => "",
        }
    }
}

/// Two-crop nutrient comparison form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompareNutrientForm {
    pub crop1: String,
    pub temperature1: String,
    pub humidity1: String,
    pub ph1: String,
    pub rainfall1: String,
    pub crop2: String,
    pub temperature2: String,
    pub humidity2: String,
    pub ph2: String,
    pub rainfall2: String,
}

impl CompareNutrientForm {
    pub fn sides(&self) -> [NutrientForm; 2] {
        [
            NutrientForm {
                temperature: self.temperature1.clone(),
                humidity: self.humidity1.clone(),
                ph: self.ph1.clone(),
                rainfall: self.rainfall1.clone(),
                crop: self.crop1.clone(),
            },
            NutrientForm {
                temperature: self.temperature2.clone(),
                humidity: self.humidity2.clone(),
                ph: self.ph2.clone(),
                rainfall: self.rainfall2.clone(),
                crop: self.crop2.clone(),
            },
        ]
    }

    pub fn validate(&self) -> Result<[ValidNutrients; 2], FormError> {
        let [first, second] = self.sides();
        if !first.is_filled() || !second.is_filled() {
            return Err(FormError::MissingComparisonFields);
        }
        Ok([first.parse_filled()?, second.parse_filled()?])
    }
}

/// JSON body for `POST /api/predict/yield`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YieldRequest {
    pub grain_weight: Option<f64>,
    pub grain_moisture: Option<f64>,
    pub harvested_area: Option<f64>,
    pub crop: Option<String>,
}

impl YieldRequest {
    pub fn validate(&self) -> Result<ValidYield, FormError> {
        match (
            self.grain_weight,
            self.grain_moisture,
            self.harvested_area,
            self.crop.as_deref().filter(|c| !c.trim().is_empty()),
        ) {
            (Some(weight), Some(moisture), Some(area), Some(crop)) => {
                build_yield(crop, weight, moisture, area)
            }
            _ => Err(FormError::MissingFields),
        }
    }
}

/// JSON body for `POST /api/predict/nutrients`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NutrientRequest {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
    pub crop: Option<String>,
}

impl NutrientRequest {
    pub fn validate(&self) -> Result<ValidNutrients, FormError> {
        match (
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
            self.crop.as_deref().filter(|c| !c.trim().is_empty()),
        ) {
            (Some(temperature), Some(humidity), Some(ph), Some(rainfall), Some(crop)) => {
                build_nutrients(crop, temperature, humidity, ph, rainfall)
            }
            _ => Err(FormError::MissingFields),
        }
    }
}
