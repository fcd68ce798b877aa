use ndarray::Array2;
use tracing::debug;

use crate::band::{BandId, SpectralBands};
use crate::georef::GeoReference;
use crate::metrics::DerivedMetrics;

/// Everything one classification run reads: the validated bands, their
/// derived metrics and the georeference forwarded to outputs.
///
/// Detectors borrow a `Scene`; nothing in it is mutated after construction.
#[derive(Clone, Debug)]
pub struct Scene {
    pub bands: SpectralBands,
    pub metrics: DerivedMetrics,
    pub georef: GeoReference,
}

impl Scene {
    pub fn new(bands: SpectralBands, georef: GeoReference) -> Self {
        let metrics = DerivedMetrics::compute(&bands);
        let (rows, cols) = bands.dim();
        debug!(rows, cols, "Derived metrics computed");
        Self {
            bands,
            metrics,
            georef,
        }
    }

    pub fn band(&self, id: BandId) -> &Array2<f32> {
        self.bands.band(id)
    }

    pub fn dim(&self) -> (usize, usize) {
        self.bands.dim()
    }
}
