//! Crop registry
//!
//! Models encode crop identity as a small integer feature. The table order
//! fixes the ids and must match the encoding the artifacts were trained with.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Crop {
    pub name: &'static str,
    pub id: u8,
}

const CROP_NAMES: [&str; 22] = [
    "rice",
    "maize",
    "chickpea",
    "kidneybeans",
    "pigeonpeas",
    "mothbeans",
    "mungbean",
    "blackgram",
    "lentil",
    "pomegranate",
    "banana",
    "mango",
    "grapes",
    "watermelon",
    "muskmelon",
    "apple",
    "orange",
    "papaya",
    "coconut",
    "cotton",
    "jute",
    "coffee",
];

/// Number of registered crops
pub const CROP_COUNT: usize = CROP_NAMES.len();

/// All crops in id order (rice = 1 ... coffee = 22).
pub fn all() -> impl ExactSizeIterator<Item = Crop> {
    CROP_NAMES.iter().copied().enumerate().map(|(i, name)| Crop {
        name,
        id: i as u8 + 1,
    })
}

/// Look up a crop by its exact registry name.
pub fn lookup(name: &str) -> Option<Crop> {
    all().find(|crop| crop.name == name)
}

/// Crop id for `name`, or `None` when the name is not registered.
pub fn crop_id(name: &str) -> Option<u8> {
    lookup(name).map(|crop| crop.id)
}

pub fn by_id(id: u8) -> Option<Crop> {
    let idx = usize::from(id).checked_sub(1)?;
    CROP_NAMES.get(idx).map(|&name| Crop { name, id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_has_22_unique_ids() {
        let ids: HashSet<u8> = all().map(|c| c.id).collect();
        assert_eq!(ids.len(), CROP_COUNT);
        assert_eq!(CROP_COUNT, 22);
        assert!(ids.iter().all(|id| (1..=22).contains(id)));
    }

    #[test]
    fn every_name_maps_back_to_its_id() {
        for crop in all() {
            assert_eq!(crop_id(crop.name), Some(crop.id));
            assert_eq!(by_id(crop.id), Some(crop));
        }
    }

    #[test]
    fn known_ids() {
        assert_eq!(crop_id("rice"), Some(1));
        assert_eq!(crop_id("maize"), Some(2));
        assert_eq!(crop_id("coffee"), Some(22));
    }

    #[test]
    fn unknown_names_are_absent() {
        assert_eq!(crop_id(""), None);
        assert_eq!(crop_id("wheat"), None);
        assert_eq!(crop_id("Rice"), None);
        assert_eq!(by_id(0), None);
        assert_eq!(by_id(23), None);
    }
}
