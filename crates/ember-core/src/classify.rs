//! Merge the detector layers into one integer-coded grid.

use std::fmt;

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::DetectionMasks;
use crate::error::{EmberError, Result};

/// Value stored in the classified raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PixelClass {
    Background = 0,
    DnFold = 1,
    Fire = 2,
    PotentialFire = 3,
}

impl PixelClass {
    pub const ALL: [PixelClass; 4] = [
        PixelClass::Background,
        PixelClass::DnFold,
        PixelClass::Fire,
        PixelClass::PotentialFire,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Label written to the `Class` attribute of exported polygons.
    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "BACKGROUND",
            Self::DnFold => "DN FOLD",
            Self::Fire => "FIRE",
            Self::PotentialFire => "POTENTIAL FIRE",
        }
    }
}

impl fmt::Display for PixelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detector layers that contribute a class code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Detector {
    DnFold,
    UnambiguousFire,
    PotentialFire,
}

impl Detector {
    pub fn class(self) -> PixelClass {
        match self {
            Self::DnFold => PixelClass::DnFold,
            Self::UnambiguousFire => PixelClass::Fire,
            Self::PotentialFire => PixelClass::PotentialFire,
        }
    }

    fn mask(self, masks: &DetectionMasks) -> &Array2<bool> {
        match self {
            Self::DnFold => &masks.dn_fold,
            Self::UnambiguousFire => &masks.unambiguous_fire,
            Self::PotentialFire => &masks.potential_fire,
        }
    }
}

/// How overlapping detector layers are resolved into one code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CompositionMode {
    /// `1*dn_fold + 2*unambiguous + 3*potential`, saturating at 3.
    ///
    /// A DN-fold pixel that is also unambiguous fire gets 3, the same code as
    /// a potential fire pixel.
    #[default]
    Additive,
    /// The first flagged detector in the list assigns its code; pixels no
    /// listed detector flags are background.
    Precedence(Vec<Detector>),
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Additive => write!(f, "Additive"),
            Self::Precedence(order) => {
                let names: Vec<String> = order.iter().map(|d| d.class().to_string()).collect();
                write!(f, "Precedence ({})", names.join(" > "))
            }
        }
    }
}

impl CompositionMode {
    pub fn validate(&self) -> Result<()> {
        if let Self::Precedence(order) = self {
            if order.is_empty() {
                return Err(EmberError::InvalidConfig(
                    "precedence order must list at least one detector".into(),
                ));
            }
            for (i, d) in order.iter().enumerate() {
                if order[..i].contains(d) {
                    return Err(EmberError::InvalidConfig(format!(
                        "detector {d:?} appears more than once in the precedence order"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Combine the detector masks into the classified grid.
///
/// Every output value is a valid `PixelClass` code.
pub fn compose(masks: &DetectionMasks, mode: &CompositionMode) -> Result<Array2<u8>> {
    mode.validate()?;
    match mode {
        CompositionMode::Additive => Ok(compose_additive(masks)),
        CompositionMode::Precedence(order) => Ok(compose_precedence(masks, order)),
    }
}

fn compose_additive(masks: &DetectionMasks) -> Array2<u8> {
    let max = PixelClass::PotentialFire.value();
    let mut saturated = 0usize;
    let classified = Zip::from(&masks.dn_fold)
        .and(&masks.unambiguous_fire)
        .and(&masks.potential_fire)
        .map_collect(|&fold, &fire, &potential| {
            u8::from(fold) + 2 * u8::from(fire) + 3 * u8::from(potential)
        })
        .mapv_into(|sum| {
            if sum > max {
                saturated += 1;
                max
            } else {
                sum
            }
        });
    if saturated > 0 {
        debug!(saturated, "Overlapping detector codes clamped to potential fire");
    }
    classified
}

fn compose_precedence(masks: &DetectionMasks, order: &[Detector]) -> Array2<u8> {
    let mut classified = Array2::<u8>::zeros(masks.dn_fold.dim());
    // Paint lowest precedence first so higher entries overwrite it.
    for detector in order.iter().rev() {
        let code = detector.class().value();
        Zip::from(&mut classified)
            .and(detector.mask(masks))
            .for_each(|out, &flagged| {
                if flagged {
                    *out = code;
                }
            });
    }
    classified
}

/// Number of pixels per class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    counts: [usize; 4],
}

impl ClassCounts {
    pub fn from_grid(classified: &Array2<u8>) -> Self {
        let mut counts = [0usize; 4];
        for &v in classified.iter() {
            if let Some(slot) = counts.get_mut(v as usize) {
                *slot += 1;
            }
        }
        Self { counts }
    }

    pub fn get(&self, class: PixelClass) -> usize {
        self.counts[class.value() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PixelClass, usize)> + '_ {
        PixelClass::ALL.iter().map(|&c| (c, self.get(c)))
    }
}
