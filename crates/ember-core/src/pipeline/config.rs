use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classify::CompositionMode;

/// Settings for the classification core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Clear potential-fire results within the window radius of every edge.
    #[serde(default = "default_true")]
    pub mask_edges: bool,
    #[serde(default)]
    pub composition: CompositionMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mask_edges: true,
            composition: CompositionMode::default(),
        }
    }
}

/// Which files a pipeline run writes besides the classified raster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Write each detector mask as a 0/255 GeoTIFF.
    #[serde(default)]
    pub write_masks: bool,
    /// Write the classified polygons as GeoJSON.
    #[serde(default = "default_true")]
    pub write_vectors: bool,
    /// Include class 0 polygons in the vector output.
    #[serde(default = "default_true")]
    pub include_background_polygons: bool,
    /// Write a colored PNG quick-look of the classified raster.
    #[serde(default)]
    pub write_preview: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            write_masks: false,
            write_vectors: true,
            include_background_polygons: true,
            write_preview: false,
        }
    }
}

/// Linear rescaling applied to raw band samples on load:
/// `reflectance = gain * sample + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReflectanceScaling {
    #[serde(default = "default_gain")]
    pub gain: f32,
    #[serde(default)]
    pub offset: f32,
}

impl ReflectanceScaling {
    pub fn is_identity(&self) -> bool {
        self.gain == 1.0 && self.offset == 0.0
    }

    #[inline]
    pub fn apply(&self, sample: f32) -> f32 {
        self.gain * sample + self.offset
    }
}

impl Default for ReflectanceScaling {
    fn default() -> Self {
        Self {
            gain: 1.0,
            offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Band files, or directories containing them.
    pub inputs: Vec<PathBuf>,
    /// Defaults to the directory holding band 1.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub scaling: ReflectanceScaling,
}

fn default_true() -> bool {
    true
}

fn default_gain() -> f32 {
    1.0
}
