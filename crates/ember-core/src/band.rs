use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{BAND_COUNT, MIN_RELIABLE_DIMENSION};
use crate::error::{EmberError, Result};

/// One of the seven reflective Landsat-8 OLI bands used by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BandId {
    B1 = 1,
    B2 = 2,
    B3 = 3,
    B4 = 4,
    B5 = 5,
    B6 = 6,
    B7 = 7,
}

impl BandId {
    pub const ALL: [BandId; BAND_COUNT] = [
        BandId::B1,
        BandId::B2,
        BandId::B3,
        BandId::B4,
        BandId::B5,
        BandId::B6,
        BandId::B7,
    ];

    /// Band number as printed in Landsat product file names.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get((n as usize).checked_sub(1)?).copied()
    }

    /// Sensor channel name.
    pub fn name(self) -> &'static str {
        match self {
            Self::B1 => "Coastal Aerosol",
            Self::B2 => "Blue",
            Self::B3 => "Green",
            Self::B4 => "Red",
            Self::B5 => "NIR",
            Self::B6 => "SWIR 1",
            Self::B7 => "SWIR 2",
        }
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Band {} ({})", self.number(), self.name())
    }
}

/// The seven aligned reflectance grids of one scene.
///
/// Construction validates that every grid has the shape of band 1, so every
/// downstream computation can index all bands with the same coordinates.
#[derive(Clone, Debug)]
pub struct SpectralBands {
    grids: [Array2<f32>; BAND_COUNT],
}

impl SpectralBands {
    pub fn new(grids: [Array2<f32>; BAND_COUNT]) -> Result<Self> {
        let (rows, cols) = validate_shapes(&grids)?;
        if is_undersized(rows, cols) {
            warn!(
                rows,
                cols,
                min = MIN_RELIABLE_DIMENSION,
                "One or more grid dimensions is smaller than the statistics window; \
                 potential-fire results near the edges are unreliable"
            );
        }
        Ok(Self { grids })
    }

    /// Build from grids ordered band 1 through band 7.
    pub fn from_vec(grids: Vec<Array2<f32>>) -> Result<Self> {
        if grids.len() > BAND_COUNT {
            return Err(EmberError::InvalidConfig(format!(
                "expected {BAND_COUNT} band grids, got {}",
                grids.len()
            )));
        }
        let supplied = grids.len();
        let grids: [Array2<f32>; BAND_COUNT] =
            grids.try_into().map_err(|_| EmberError::MissingBand {
                band: supplied as u8 + 1,
            })?;
        Self::new(grids)
    }

    pub fn band(&self, id: BandId) -> &Array2<f32> {
        &self.grids[id.index()]
    }

    /// Shape shared by all bands, as (rows, cols).
    pub fn dim(&self) -> (usize, usize) {
        self.grids[0].dim()
    }

    /// True when either dimension is below the statistics window size.
    pub fn is_undersized(&self) -> bool {
        let (rows, cols) = self.dim();
        is_undersized(rows, cols)
    }
}

fn is_undersized(rows: usize, cols: usize) -> bool {
    rows < MIN_RELIABLE_DIMENSION || cols < MIN_RELIABLE_DIMENSION
}

/// Check that all grids share the shape of the first and that it is non-empty.
///
/// Returns the common shape as (rows, cols).
pub fn validate_shapes(grids: &[Array2<f32>]) -> Result<(usize, usize)> {
    let first = grids.first().ok_or(EmberError::MissingBand { band: 1 })?;
    let expected = first.dim();
    if expected.0 == 0 || expected.1 == 0 {
        return Err(EmberError::EmptyGrid);
    }
    for (i, grid) in grids.iter().enumerate().skip(1) {
        if grid.dim() != expected {
            return Err(EmberError::ShapeMismatch {
                band: i as u8 + 1,
                expected,
                found: grid.dim(),
            });
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_numbers_round_trip() {
        for id in BandId::ALL {
            assert_eq!(BandId::from_number(id.number()), Some(id));
        }
        assert_eq!(BandId::from_number(0), None);
        assert_eq!(BandId::from_number(8), None);
    }

    #[test]
    fn test_display_includes_name() {
        assert_eq!(BandId::B6.to_string(), "Band 6 (SWIR 1)");
    }

    #[test]
    fn test_short_vec_reports_first_missing_band() {
        let grids = vec![Array2::<f32>::zeros((4, 4)); 5];
        match SpectralBands::from_vec(grids) {
            Err(EmberError::MissingBand { band }) => assert_eq!(band, 6),
            other => panic!("expected MissingBand, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_grids_rejected() {
        let grids = vec![Array2::<f32>::zeros((4, 4)); 9];
        match SpectralBands::from_vec(grids) {
            Err(EmberError::InvalidConfig(msg)) => assert!(msg.contains("got 9")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_grid_rejected() {
        let grids = vec![Array2::<f32>::zeros((0, 4)); BAND_COUNT];
        assert!(matches!(
            SpectralBands::from_vec(grids),
            Err(EmberError::EmptyGrid)
        ));
    }
}
