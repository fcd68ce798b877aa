use ndarray::{Array2, Zip};

use crate::band::BandId;
use crate::consts::WATER_DIFF17_MAX;
use crate::scene::Scene;

/// Spectral shape shared by all water: reflectance falling from red through
/// SWIR 2, with little difference between coastal aerosol and SWIR 2.
#[inline]
pub fn is_water_base(band4: f32, band5: f32, band6: f32, band7: f32, diff17: f32) -> bool {
    band4 > band5 && band5 > band6 && band6 > band7 && diff17 < WATER_DIFF17_MAX
}

/// Either turbid water (green above blue) or clear water (strictly falling
/// reflectance from coastal aerosol to red).
#[inline]
pub fn is_water_type(band1: f32, band2: f32, band3: f32, band4: f32) -> bool {
    band3 > band2 || (band1 > band2 && band2 > band3 && band3 > band4)
}

pub fn water(scene: &Scene) -> Array2<bool> {
    let base = Zip::from(scene.band(BandId::B4))
        .and(scene.band(BandId::B5))
        .and(scene.band(BandId::B6))
        .and(scene.band(BandId::B7))
        .and(&scene.metrics.diff17)
        .map_collect(|&b4, &b5, &b6, &b7, &d17| is_water_base(b4, b5, b6, b7, d17));

    let water_type = Zip::from(scene.band(BandId::B1))
        .and(scene.band(BandId::B2))
        .and(scene.band(BandId::B3))
        .and(scene.band(BandId::B4))
        .map_collect(|&b1, &b2, &b3, &b4| is_water_type(b1, b2, b3, b4));

    base & water_type
}
