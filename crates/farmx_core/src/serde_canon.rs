//! Canonical JSON for artifact fingerprints
//!
//! Object keys are sorted recursively and no whitespace is emitted, so the
//! blake3 hash of an artifact depends only on its parameters and not on how
//! the file was formatted.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json_value = serde_json::to_value(value)
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))?;

    serde_json::to_string(&canonicalize_value(json_value))
        .map_err(|e| CanonicalError::SerializationError(e.to_string()))
}

fn canonicalize_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: BTreeMap<_, _> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize_value(v)))
                .collect();
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(canonicalize_value).collect())
        }
        other => other,
    }
}

/// Blake3 hash of the canonical JSON form, hex encoded
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json = to_canonical_json(value)?;
    Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        b_field: i64,
        a_field: i64,
        z_field: Vec<f64>,
    }

    fn sample(b: i64) -> Sample {
        Sample {
            b_field: b,
            a_field: 1,
            z_field: vec![0.5, 1.5],
        }
    }

    #[test]
    fn keys_are_sorted_without_whitespace() {
        let json = to_canonical_json(&sample(2)).unwrap();
        assert_eq!(json, r#"{"a_field":1,"b_field":2,"z_field":[0.5,1.5]}"#);
    }

    #[test]
    fn formatting_does_not_change_the_hash() {
        let pretty = serde_json::to_string_pretty(&sample(2)).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(
            hash_canonical_hex(&reparsed).unwrap(),
            hash_canonical_hex(&sample(2)).unwrap()
        );
    }

    #[test]
    fn hash_changes_with_data() {
        let h1 = hash_canonical_hex(&sample(2)).unwrap();
        let h2 = hash_canonical_hex(&sample(3)).unwrap();
        assert_ne!(h1, h2);
        assert_eq!(h1.len(), 64);
    }
}
