use ndarray::{Array2, Zip};

use crate::band::{BandId, SpectralBands};

/// Pixel-wise ratios and differences derived from the raw bands.
///
/// Ratios are plain IEEE divisions: a zero denominator yields `±inf` or
/// `NaN` rather than an error. Every detector compares with strict
/// inequalities, so `NaN` fails all of them and infinities only pass the
/// comparison they physically should.
#[derive(Clone, Debug)]
pub struct DerivedMetrics {
    /// band7 / band5
    pub ratio75: Array2<f32>,
    /// band7 / band6
    pub ratio76: Array2<f32>,
    /// band7 - band5
    pub diff75: Array2<f32>,
    /// band1 - band7
    pub diff17: Array2<f32>,
}

impl DerivedMetrics {
    pub fn compute(bands: &SpectralBands) -> Self {
        let b1 = bands.band(BandId::B1);
        let b5 = bands.band(BandId::B5);
        let b6 = bands.band(BandId::B6);
        let b7 = bands.band(BandId::B7);

        Self {
            ratio75: Zip::from(b7).and(b5).map_collect(|&a, &b| a / b),
            ratio76: Zip::from(b7).and(b6).map_collect(|&a, &b| a / b),
            diff75: Zip::from(b7).and(b5).map_collect(|&a, &b| a - b),
            diff17: Zip::from(b1).and(b7).map_collect(|&a, &b| a - b),
        }
    }
}
