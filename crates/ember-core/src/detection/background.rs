use ndarray::{Array2, Zip};

use crate::band::BandId;
use crate::scene::Scene;

/// Valid background pixels: neither unambiguous fire nor water, with a
/// positive band 7 signal. These are the only pixels the local statistics
/// are computed from and the only candidates for potential fire.
pub fn background(
    scene: &Scene,
    unambiguous_fire: &Array2<bool>,
    water: &Array2<bool>,
) -> Array2<bool> {
    Zip::from(unambiguous_fire)
        .and(water)
        .and(scene.band(BandId::B7))
        .map_collect(|&fire, &water, &b7| !(fire || water) && b7 > 0.0)
}
