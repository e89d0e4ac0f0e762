//! Classifier configuration

use serde::{Deserialize, Serialize};

/// Thresholds applied to every class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Pixels with saturation at or below this are dropped (near-gray).
    pub min_saturation: u8,
    /// Pixels with value at or below this are dropped (near-black).
    pub min_value: u8,
    /// Largest region must have strictly more pixels than this to be reported.
    pub min_area: u32,
    /// Radius of the morphological opening applied to each mask; 0 disables it.
    pub open_radius: u8,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            min_saturation: 50,
            min_value: 50,
            min_area: 500,
            open_radius: 0,
        }
    }
}

impl ClassifierParams {
    /// Defaults with specks removed before region extraction
    pub fn denoised() -> Self {
        Self {
            open_radius: 2,
            ..Default::default()
        }
    }
}
