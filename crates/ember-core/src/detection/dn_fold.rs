use ndarray::{Array2, Zip};

use crate::band::BandId;
use crate::consts::{DN_FOLD_BAND1_MAX, DN_FOLD_BAND5_MIN, DN_FOLD_BAND6_MIN, DN_FOLD_BAND7_MAX};
use crate::scene::Scene;

/// DN folding test for a single pixel.
#[inline]
pub fn is_dn_fold(band1: f32, band5: f32, band6: f32, band7: f32) -> bool {
    let saturated = band6 > DN_FOLD_BAND6_MIN && band1 < DN_FOLD_BAND1_MAX;
    saturated && (band5 > DN_FOLD_BAND5_MIN || band7 < DN_FOLD_BAND7_MAX)
}

/// Flag pixels where SWIR saturation folds the digital numbers over and
/// produces a fire-like signature.
pub fn dn_fold(scene: &Scene) -> Array2<bool> {
    Zip::from(scene.band(BandId::B1))
        .and(scene.band(BandId::B5))
        .and(scene.band(BandId::B6))
        .and(scene.band(BandId::B7))
        .map_collect(|&b1, &b5, &b6, &b7| is_dn_fold(b1, b5, b6, b7))
}
