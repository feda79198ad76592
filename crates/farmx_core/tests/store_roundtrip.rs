//! Loading artifact directories from disk

use farmx_core::{demo, AdvisorError, ModelStore, NutrientInputs, Target, YieldInputs};
use std::fs;
use tempfile::TempDir;

fn demo_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    demo::demo_store().unwrap().write_dir(dir.path()).unwrap();
    dir
}

#[test]
fn written_store_loads_with_same_predictions() {
    let dir = demo_dir();
    let loaded = ModelStore::load_dir(dir.path()).unwrap();
    let reference = demo::demo_store().unwrap();

    assert_eq!(loaded.source(), Some(dir.path()));
    assert_eq!(
        loaded.artifact_hashes().unwrap(),
        reference.artifact_hashes().unwrap()
    );

    let inputs = NutrientInputs {
        humidity: 55.0,
        temperature: 18.0,
        rainfall: 40.0,
        ph: 5.2,
        crop_id: 9,
    };
    assert_eq!(
        loaded.predict_nutrients(&inputs).unwrap(),
        reference.predict_nutrients(&inputs).unwrap()
    );
}

#[test]
fn every_artifact_file_is_written() {
    let dir = demo_dir();
    for target in Target::ALL {
        let (scaler, predictor) = target.file_names();
        assert!(dir.path().join(scaler).is_file(), "{scaler}");
        assert!(dir.path().join(predictor).is_file(), "{predictor}");
    }
}

#[test]
fn missing_artifact_is_an_io_error() {
    let dir = demo_dir();
    fs::remove_file(dir.path().join("rf_p_category_classifier.json")).unwrap();

    let err = ModelStore::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, AdvisorError::Io { .. }));
    assert!(err.to_string().contains("rf_p_category_classifier.json"));
}

#[test]
fn corrupt_artifact_is_a_parse_error() {
    let dir = demo_dir();
    fs::write(dir.path().join("scaler_yield.json"), "{\"kind\":\"standard\"").unwrap();

    let err = ModelStore::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, AdvisorError::Parse { .. }));
}

#[test]
fn scaler_of_wrong_width_is_rejected() {
    let dir = demo_dir();
    fs::write(
        dir.path().join("scaler_yield.json"),
        r#"{"kind":"standard","mean":[0.0,0.0,0.0],"scale":[1.0,1.0,1.0]}"#,
    )
    .unwrap();

    let err = ModelStore::load_dir(dir.path()).unwrap_err();
    match err {
        AdvisorError::InvalidArtifact { name, reason } => {
            assert_eq!(name, "yield");
            assert!(reason.contains("scaler takes 3"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rice_yield_scenario_is_non_negative() {
    let store = ModelStore::load_dir(demo_dir().path()).unwrap();
    let value = store
        .predict_yield(&YieldInputs {
            grain_weight: 50.0,
            grain_moisture: 12.0,
            harvested_area: 1.0,
            crop_id: farmx_core::crop_id("rice").unwrap(),
        })
        .unwrap();
    assert!(value >= 0.0);
    assert!(value.is_finite());
}

#[test]
fn maize_nutrient_scenario_returns_three_labels_and_a_value() {
    let store = demo::demo_store().unwrap();
    let report = store
        .predict_nutrients(&NutrientInputs {
            humidity: 80.0,
            temperature: 25.0,
            rainfall: 200.0,
            ph: 6.5,
            crop_id: farmx_core::crop_id("maize").unwrap(),
        })
        .unwrap();

    for label in [&report.n_category, &report.p_category, &report.k_category] {
        assert!(demo::LABELS.contains(&label.as_str()));
    }
    assert!(report.n_value >= 0.0);
}
