use ndarray::{Array2, Zip};

use crate::band::BandId;
use crate::consts::{FIRE_BAND7_MIN, FIRE_DIFF75_MIN, FIRE_RATIO75_MIN};
use crate::scene::Scene;

/// Unambiguous fire test for a single pixel.
#[inline]
pub fn is_unambiguous_fire(ratio75: f32, diff75: f32, band7: f32) -> bool {
    ratio75 > FIRE_RATIO75_MIN && diff75 > FIRE_DIFF75_MIN && band7 > FIRE_BAND7_MIN
}

/// Flag pixels whose SWIR 2 signal is strong enough, both absolutely and
/// relative to NIR, to be a fire without consulting the neighborhood.
pub fn unambiguous_fire(scene: &Scene) -> Array2<bool> {
    let m = &scene.metrics;
    Zip::from(&m.ratio75)
        .and(&m.diff75)
        .and(scene.band(BandId::B7))
        .map_collect(|&ratio, &diff, &b7| is_unambiguous_fire(ratio, diff, b7))
}
