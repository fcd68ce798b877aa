pub mod background;
pub mod dn_fold;
pub mod potential;
pub mod unambiguous;
pub mod water;
pub mod window;

use ndarray::Array2;

pub use background::background;
pub use dn_fold::dn_fold;
pub use potential::{adaptive_thresholds, potential_fire, AdaptiveThresholds};
pub use unambiguous::unambiguous_fire;
pub use water::water;
pub use window::{masked_window_statistics, uniform_filter, WindowStatistics};

/// The five boolean layers produced by one classification run.
#[derive(Clone, Debug)]
pub struct DetectionMasks {
    pub unambiguous_fire: Array2<bool>,
    pub dn_fold: Array2<bool>,
    pub water: Array2<bool>,
    pub background: Array2<bool>,
    pub potential_fire: Array2<bool>,
}

impl DetectionMasks {
    /// Masks paired with the name used in logs and exported file names.
    pub fn named(&self) -> [(&'static str, &Array2<bool>); 5] {
        [
            ("unambiguous_fire", &self.unambiguous_fire),
            ("dn_fold", &self.dn_fold),
            ("water", &self.water),
            ("background", &self.background),
            ("potential_fire", &self.potential_fire),
        ]
    }
}
