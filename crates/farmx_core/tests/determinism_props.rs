use farmx_core::{crops, demo, NutrientInputs, YieldInputs};
use proptest::prelude::*;

// Inference over in-range inputs must always succeed and be repeatable.

fn crop_ids() -> impl Strategy<Value = u8> {
    1u8..=crops::CROP_COUNT as u8
}

fn nutrient_inputs() -> impl Strategy<Value = NutrientInputs> {
    (
        0.0f64..=100.0,
        -100.0f64..=100.0,
        0.0f64..=5_000.0,
        0.0f64..=14.0,
        crop_ids(),
    )
        .prop_map(|(humidity, temperature, rainfall, ph, crop_id)| NutrientInputs {
            humidity,
            temperature,
            rainfall,
            ph,
            crop_id,
        })
}

fn yield_inputs() -> impl Strategy<Value = YieldInputs> {
    (0.0f64..=100_000.0, 0.0f64..=100.0, 0.0f64..=10_000.0, crop_ids()).prop_map(
        |(grain_weight, grain_moisture, harvested_area, crop_id)| YieldInputs {
            grain_weight,
            grain_moisture,
            harvested_area,
            crop_id,
        },
    )
}

proptest! {
    #[test]
    fn nutrient_predictions_are_deterministic(inputs in nutrient_inputs()) {
        let store = demo::demo_store().unwrap();
        let first = store.predict_nutrients(&inputs);
        prop_assert!(first.is_ok());
        let first = first.unwrap();
        prop_assert_eq!(&first, &store.predict_nutrients(&inputs).unwrap());
        prop_assert!(first.n_value >= 0.0);
    }

    #[test]
    fn yield_predictions_are_deterministic(inputs in yield_inputs()) {
        let store = demo::demo_store().unwrap();
        let first = store.predict_yield(&inputs);
        prop_assert!(first.is_ok());
        let first = first.unwrap();
        prop_assert!(first >= 0.0);
        prop_assert_eq!(first, store.predict_yield(&inputs).unwrap());
    }
}
