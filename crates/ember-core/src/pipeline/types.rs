use std::path::PathBuf;

use ndarray::Array2;

use crate::classify::ClassCounts;
use crate::detection::DetectionMasks;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Discovering,
    Loading,
    DerivedMetrics,
    Detection,
    BackgroundStatistics,
    Composition,
    Writing,
    Vectorizing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovering => write!(f, "Locating bands"),
            Self::Loading => write!(f, "Loading bands"),
            Self::DerivedMetrics => write!(f, "Computing ratios"),
            Self::Detection => write!(f, "Running detectors"),
            Self::BackgroundStatistics => write!(f, "Background statistics"),
            Self::Composition => write!(f, "Classifying"),
            Self::Writing => write!(f, "Writing rasters"),
            Self::Vectorizing => write!(f, "Vectorizing"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn begin_stage(&self, _stage: PipelineStage) {}

    fn finish_stage(&self) {}
}

/// Reporter that ignores every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Result of classifying one scene in memory.
#[derive(Clone, Debug)]
pub struct ClassificationOutput {
    pub masks: DetectionMasks,
    /// Values in 0..=3, see `PixelClass`.
    pub classified: Array2<u8>,
    pub counts: ClassCounts,
    /// Set when the grid is smaller than the statistics window.
    pub size_warning: bool,
}

/// Summary of a full pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub base_name: String,
    pub rows: usize,
    pub cols: usize,
    pub counts: ClassCounts,
    pub size_warning: bool,
    pub mask_edges: bool,
    /// Number of polygons written, when vectors were requested.
    pub polygons: Option<usize>,
    pub written: Vec<PathBuf>,
}
