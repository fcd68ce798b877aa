pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{classify_scene, run_pipeline, run_pipeline_reported};
pub use types::{
    ClassificationOutput, NoOpReporter, PipelineReport, PipelineStage, ProgressReporter,
};
