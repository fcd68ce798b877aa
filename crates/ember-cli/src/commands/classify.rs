use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ember_core::classify::{CompositionMode, Detector};
use ember_core::pipeline::config::PipelineConfig;
use ember_core::pipeline::{run_pipeline_reported, PipelineStage, ProgressReporter};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Band files, or a directory containing them
    pub inputs: Vec<PathBuf>,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory (defaults to the directory holding band 1)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Keep potential fire results within 30 pixels of the scene edge
    #[arg(long)]
    pub no_edge_mask: bool,

    /// Also write each detector mask as a GeoTIFF
    #[arg(long)]
    pub masks: bool,

    /// Skip the GeoJSON polygon layer
    #[arg(long)]
    pub no_vectors: bool,

    /// Leave background polygons out of the polygon layer
    #[arg(long)]
    pub no_background_polygons: bool,

    /// Write a PNG quick-look of the classified raster
    #[arg(long)]
    pub preview: bool,

    /// Resolve overlapping detectors by priority instead of summing codes,
    /// highest first (e.g. `fire,dn-fold,potential`)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub precedence: Option<Vec<DetectorArg>>,

    /// Multiply raw samples by this factor on load
    #[arg(long)]
    pub gain: Option<f32>,

    /// Add this offset to raw samples on load, after the gain
    #[arg(long)]
    pub offset: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DetectorArg {
    Fire,
    DnFold,
    Potential,
}

impl From<DetectorArg> for Detector {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Fire => Detector::UnambiguousFire,
            DetectorArg::DnFold => Detector::DnFold,
            DetectorArg::Potential => Detector::PotentialFire,
        }
    }
}

/// Drives an indicatif bar from pipeline stage events.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self) {
        self.bar.inc(1);
    }
}

pub fn run(args: &ClassifyArgs) -> Result<()> {
    let config = build_config(args)?;
    crate::summary::print_classify_summary(&config);

    let stages = if config.export.write_vectors { 8 } else { 7 };
    let bar = ProgressBar::new(stages);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:22} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { bar: bar.clone() });

    let start = Instant::now();
    let result = run_pipeline_reported(&config, reporter);
    match result {
        Ok(report) => {
            bar.finish_with_message("Done");
            crate::summary::print_report(&report, start.elapsed());
            Ok(())
        }
        Err(e) => {
            bar.abandon_with_message("Failed");
            Err(e).context("Classification failed")
        }
    }
}

fn build_config(args: &ClassifyArgs) -> Result<PipelineConfig> {
    let mut config: PipelineConfig = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig {
            inputs: Vec::new(),
            output_dir: None,
            classifier: Default::default(),
            export: Default::default(),
            scaling: Default::default(),
        }
    };

    // Command-line values override the config file.
    if !args.inputs.is_empty() {
        config.inputs = args.inputs.clone();
    }
    if config.inputs.is_empty() {
        anyhow::bail!("No input bands given");
    }
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir.clone();
    }
    if args.no_edge_mask {
        config.classifier.mask_edges = false;
    }
    if let Some(ref order) = args.precedence {
        config.classifier.composition =
            CompositionMode::Precedence(order.iter().map(|&d| d.into()).collect());
    }
    config.export.write_masks |= args.masks;
    config.export.write_preview |= args.preview;
    if args.no_vectors {
        config.export.write_vectors = false;
    }
    if args.no_background_polygons {
        config.export.include_background_polygons = false;
    }
    if let Some(gain) = args.gain {
        config.scaling.gain = gain;
    }
    if let Some(offset) = args.offset {
        config.scaling.offset = offset;
    }

    Ok(config)
}
