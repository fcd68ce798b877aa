use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use tracing::{info, warn};

use crate::band::{BandId, SpectralBands};
use crate::classify::{compose, ClassCounts, PixelClass};
use crate::consts::{
    BACKGROUND_MASK_SUFFIX, CLASS_PREVIEW_SUFFIX, CLASS_RASTER_SUFFIX, DN_FOLD_MASK_SUFFIX,
    FIRE_MASK_SUFFIX, POTENTIAL_MASK_SUFFIX, VECTOR_FILE_NAME, WATER_MASK_SUFFIX,
};
use crate::detection::{self, DetectionMasks};
use crate::error::Result;
use crate::georef::GeoReference;
use crate::io::band_files::BandFiles;
use crate::io::geotiff::{read_band, write_classified, write_mask};
use crate::io::preview::save_preview;
use crate::scene::Scene;
use crate::vector::{polygonize, write_geojson};

use super::config::{ClassifierConfig, PipelineConfig};
use super::types::{
    ClassificationOutput, NoOpReporter, PipelineReport, PipelineStage, ProgressReporter,
};

/// Classify an in-memory scene.
///
/// Runs the independent detectors, builds the background mask, computes the
/// potential fire layer from local background statistics and composes the
/// classified grid. Performs no I/O.
pub fn classify_scene(
    scene: &Scene,
    config: &ClassifierConfig,
    reporter: &dyn ProgressReporter,
) -> Result<ClassificationOutput> {
    // Reject a bad composition before spending time on the window statistics.
    config.composition.validate()?;

    reporter.begin_stage(PipelineStage::Detection);
    let unambiguous_fire = detection::unambiguous_fire(scene);
    let dn_fold = detection::dn_fold(scene);
    let water = detection::water(scene);
    let background = detection::background(scene, &unambiguous_fire, &water);
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::BackgroundStatistics);
    let potential_fire = detection::potential_fire(scene, &background, config.mask_edges);
    reporter.finish_stage();

    let masks = DetectionMasks {
        unambiguous_fire,
        dn_fold,
        water,
        background,
        potential_fire,
    };
    for (name, mask) in masks.named() {
        info!(mask = name, pixels = count_true(mask), "Detector mask");
    }

    reporter.begin_stage(PipelineStage::Composition);
    let classified = compose(&masks, &config.composition)?;
    let counts = ClassCounts::from_grid(&classified);
    reporter.finish_stage();

    for (class, n) in counts.iter() {
        info!(class = class.label(), pixels = n, "Classified");
    }

    Ok(ClassificationOutput {
        masks,
        classified,
        counts,
        size_warning: scene.bands.is_undersized(),
    })
}

fn count_true(mask: &Array2<bool>) -> usize {
    mask.iter().filter(|&&v| v).count()
}

/// Run the full pipeline with a thread-safe progress reporter.
///
/// Every fatal input problem (missing band, unreadable file, shape
/// mismatch) is reported before any detector runs.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineReport> {
    config.classifier.composition.validate()?;

    reporter.begin_stage(PipelineStage::Discovering);
    let files = BandFiles::discover(&config.inputs)?;
    reporter.finish_stage();
    info!(base = %files.base_name, "All required bands located");

    reporter.begin_stage(PipelineStage::Loading);
    let mut grids = Vec::with_capacity(BandId::ALL.len());
    let mut references = Vec::with_capacity(BandId::ALL.len());
    for (id, path) in files.iter() {
        let band = read_band(path, &config.scaling)?;
        info!(band = %id, rows = band.data.nrows(), cols = band.data.ncols(), "Band loaded");
        grids.push(band.data);
        references.push(band.georef);
    }
    let bands = SpectralBands::from_vec(grids)?;
    reporter.finish_stage();

    let georef = output_reference(references);
    if georef.is_empty() {
        warn!("Input bands carry no GeoTIFF georeferencing; outputs use pixel coordinates");
    }

    reporter.begin_stage(PipelineStage::DerivedMetrics);
    let scene = Scene::new(bands, georef);
    reporter.finish_stage();

    let output = classify_scene(&scene, &config.classifier, reporter.as_ref())?;

    let output_dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => files
            .path(BandId::B1)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    if !output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&output_dir)?;
    }
    let out_path = |suffix: &str| output_dir.join(format!("{}{}", files.base_name, suffix));

    reporter.begin_stage(PipelineStage::Writing);
    let mut written: Vec<PathBuf> = Vec::new();
    if config.export.write_masks {
        let m = &output.masks;
        for (mask, suffix) in [
            (&m.unambiguous_fire, FIRE_MASK_SUFFIX),
            (&m.dn_fold, DN_FOLD_MASK_SUFFIX),
            (&m.water, WATER_MASK_SUFFIX),
            (&m.background, BACKGROUND_MASK_SUFFIX),
            (&m.potential_fire, POTENTIAL_MASK_SUFFIX),
        ] {
            let path = out_path(suffix);
            write_mask(&path, mask, &scene.georef)?;
            written.push(path);
        }
    }
    let class_path = out_path(CLASS_RASTER_SUFFIX);
    write_classified(&class_path, &output.classified, &scene.georef)?;
    written.push(class_path);
    if config.export.write_preview {
        let path = out_path(CLASS_PREVIEW_SUFFIX);
        save_preview(&output.classified, &path)?;
        written.push(path);
    }
    reporter.finish_stage();

    let polygons = if config.export.write_vectors {
        reporter.begin_stage(PipelineStage::Vectorizing);
        let transform = scene.georef.transform();
        let polygons = polygonize(
            &output.classified,
            &transform,
            config.export.include_background_polygons,
        );
        let path = output_dir.join(VECTOR_FILE_NAME);
        write_geojson(&path, &polygons)?;
        info!(
            polygons = polygons.len(),
            fire = polygons.iter().filter(|p| p.class == PixelClass::Fire).count(),
            path = %path.display(),
            "Polygon layer written"
        );
        written.push(path);
        reporter.finish_stage();
        Some(polygons.len())
    } else {
        None
    };

    for path in &written {
        info!(path = %path.display(), "Output written");
    }

    let (rows, cols) = scene.dim();
    Ok(PipelineReport {
        base_name: files.base_name.clone(),
        rows,
        cols,
        counts: output.counts,
        size_warning: output.size_warning,
        mask_edges: config.classifier.mask_edges,
        polygons,
        written,
    })
}

/// Outputs take band 5's georeference, or band 1's when band 5 has none.
fn output_reference(mut references: Vec<GeoReference>) -> GeoReference {
    let nir = references.swap_remove(BandId::B5.number() as usize - 1);
    if !nir.is_empty() {
        return nir;
    }
    references.swap_remove(0)
}

/// Run the full pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}
