#[allow(dead_code)]
mod common;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use common::{bands_from_fn, write_band_files, Pixel, QUIET};
use ember_core::band::SpectralBands;
use ember_core::classify::PixelClass;
use ember_core::consts::{CLASS_RASTER_SUFFIX, FIRE_MASK_SUFFIX, VECTOR_FILE_NAME};
use ember_core::error::EmberError;
use ember_core::georef::GeoTransform;
use ember_core::io::geotiff::read_band;
use ember_core::pipeline::config::{ExportConfig, PipelineConfig, ReflectanceScaling};
use ember_core::pipeline::{run_pipeline, run_pipeline_reported, PipelineStage, ProgressReporter};

const FIRE: Pixel = [0.1, 0.1, 0.1, 0.1, 0.1, 0.2, 0.6];
const HOT: Pixel = [0.1, 0.1, 0.1, 0.1, 0.2, 0.2, 0.45];
const FIRE_AT: (usize, usize) = (20, 50);
const HOT_AT: (usize, usize) = (35, 35);

fn test_scene_bands() -> SpectralBands {
    bands_from_fn(70, 70, |r, c| match (r, c) {
        FIRE_AT => FIRE,
        HOT_AT => HOT,
        _ => QUIET,
    })
}

fn utm_transform() -> GeoTransform {
    GeoTransform::new(500_000.0, 4_000_000.0, 30.0, -30.0)
}

/// Write the test scene under `<tmp>/in` and return a config writing to `<tmp>/out`.
fn setup(tmp: &TempDir, export: ExportConfig) -> PipelineConfig {
    let input = tmp.path().join("in");
    std::fs::create_dir_all(&input).unwrap();
    write_band_files(&input, "LC08_TEST", &test_scene_bands(), Some(&utm_transform()));
    PipelineConfig {
        inputs: vec![input],
        output_dir: Some(tmp.path().join("out")),
        classifier: Default::default(),
        export,
        scaling: Default::default(),
    }
}

fn out_file(tmp: &TempDir, name: &str) -> PathBuf {
    tmp.path().join("out").join(name)
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_writes_classified_raster() {
    let tmp = TempDir::new().unwrap();
    let config = setup(&tmp, ExportConfig::default());
    let report = run_pipeline(&config).unwrap();

    assert_eq!(report.base_name, "LC08_TEST");
    assert_eq!((report.rows, report.cols), (70, 70));
    assert_eq!(report.counts.get(PixelClass::Fire), 1);
    assert_eq!(report.counts.get(PixelClass::PotentialFire), 1);
    assert_eq!(report.counts.get(PixelClass::DnFold), 0);
    assert!(!report.size_warning);

    let class_path = out_file(&tmp, &format!("LC08_TEST{CLASS_RASTER_SUFFIX}"));
    let classified = read_band(&class_path, &ReflectanceScaling::default()).unwrap();
    assert_eq!(classified.data[[FIRE_AT.0, FIRE_AT.1]], 2.0);
    assert_eq!(classified.data[[HOT_AT.0, HOT_AT.1]], 3.0);
    assert_eq!(classified.data[[0, 0]], 0.0);
    assert_eq!(classified.georef.transform(), utm_transform());
}

#[test]
fn test_pipeline_masks_and_preview() {
    let tmp = TempDir::new().unwrap();
    let export = ExportConfig {
        write_masks: true,
        write_preview: true,
        ..Default::default()
    };
    let config = setup(&tmp, export);
    let report = run_pipeline(&config).unwrap();

    // Five masks, the classified raster, the preview and the polygon layer.
    assert_eq!(report.written.len(), 8);
    for path in &report.written {
        assert!(path.exists(), "{} missing", path.display());
    }

    let fire = read_band(
        &out_file(&tmp, &format!("LC08_TEST{FIRE_MASK_SUFFIX}")),
        &ReflectanceScaling::default(),
    )
    .unwrap();
    assert_eq!(fire.data[[FIRE_AT.0, FIRE_AT.1]], 255.0);
    assert_eq!(fire.data.iter().filter(|&&v| v != 0.0).count(), 1);
}

#[test]
fn test_pipeline_polygon_layer() {
    let tmp = TempDir::new().unwrap();
    let config = setup(&tmp, ExportConfig::default());
    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.polygons, Some(3));

    let text = std::fs::read_to_string(out_file(&tmp, VECTOR_FILE_NAME)).unwrap();
    let fc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let features = fc["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);

    let fire = features
        .iter()
        .find(|f| f["properties"]["Class"] == "FIRE")
        .unwrap();
    assert_eq!(fire["properties"]["Value"], 2);
    let ring = fire["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5);
    let x0 = 500_000.0 + FIRE_AT.1 as f64 * 30.0;
    let y0 = 4_000_000.0 - FIRE_AT.0 as f64 * 30.0;
    for p in ring {
        let (x, y) = (p[0].as_f64().unwrap(), p[1].as_f64().unwrap());
        assert!(x == x0 || x == x0 + 30.0);
        assert!(y == y0 || y == y0 - 30.0);
    }

    let background = features
        .iter()
        .find(|f| f["properties"]["Class"] == "BACKGROUND")
        .unwrap();
    assert_eq!(background["geometry"]["coordinates"].as_array().unwrap().len(), 3);
}

#[test]
fn test_pipeline_without_vectors_or_background_polygons() {
    let tmp = TempDir::new().unwrap();
    let config = setup(
        &tmp,
        ExportConfig {
            include_background_polygons: false,
            ..Default::default()
        },
    );
    assert_eq!(run_pipeline(&config).unwrap().polygons, Some(2));

    let tmp = TempDir::new().unwrap();
    let config = setup(
        &tmp,
        ExportConfig {
            write_vectors: false,
            ..Default::default()
        },
    );
    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.polygons, None);
    assert!(!out_file(&tmp, VECTOR_FILE_NAME).exists());
}

#[test]
fn test_pipeline_applies_reflectance_scaling() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    std::fs::create_dir_all(&input).unwrap();
    let raw = bands_from_fn(70, 70, |r, c| {
        let p = match (r, c) {
            FIRE_AT => FIRE,
            HOT_AT => HOT,
            _ => QUIET,
        };
        p.map(|v| v * 10_000.0)
    });
    write_band_files(&input, "LC08_RAW", &raw, None);

    let config = PipelineConfig {
        inputs: vec![input],
        output_dir: Some(tmp.path().join("out")),
        classifier: Default::default(),
        export: ExportConfig {
            write_vectors: false,
            ..Default::default()
        },
        scaling: ReflectanceScaling {
            gain: 1.0e-4,
            offset: 0.0,
        },
    };
    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.counts.get(PixelClass::Fire), 1);
    assert_eq!(report.counts.get(PixelClass::PotentialFire), 1);
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_missing_band() {
    let tmp = TempDir::new().unwrap();
    let config = setup(&tmp, ExportConfig::default());
    std::fs::remove_file(tmp.path().join("in").join("LC08_TEST_B6.TIF")).unwrap();
    assert!(matches!(
        run_pipeline(&config),
        Err(EmberError::MissingBand { band: 6 })
    ));
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_pipeline_shape_mismatch() {
    let tmp = TempDir::new().unwrap();
    let config = setup(&tmp, ExportConfig::default());
    let narrow = ndarray::Array2::<f32>::from_elem((70, 69), 0.1);
    common::write_f32_geotiff(
        &tmp.path().join("in").join("LC08_TEST_B3.TIF"),
        &narrow,
        None,
    );
    assert!(matches!(
        run_pipeline(&config),
        Err(EmberError::ShapeMismatch { band: 3, .. })
    ));
}

#[test]
fn test_pipeline_unreadable_band() {
    let tmp = TempDir::new().unwrap();
    let config = setup(&tmp, ExportConfig::default());
    std::fs::write(tmp.path().join("in").join("LC08_TEST_B2.TIF"), b"not a tiff").unwrap();
    assert!(run_pipeline(&config).is_err());
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<PipelineStage>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.stages.lock().unwrap().push(stage);
    }
}

#[test]
fn test_pipeline_reports_stages_in_order() {
    let tmp = TempDir::new().unwrap();
    let config = setup(&tmp, ExportConfig::default());
    let reporter = Arc::new(RecordingReporter::default());
    run_pipeline_reported(&config, reporter.clone()).unwrap();

    let stages = reporter.stages.lock().unwrap().clone();
    assert_eq!(
        stages,
        vec![
            PipelineStage::Discovering,
            PipelineStage::Loading,
            PipelineStage::DerivedMetrics,
            PipelineStage::Detection,
            PipelineStage::BackgroundStatistics,
            PipelineStage::Composition,
            PipelineStage::Writing,
            PipelineStage::Vectorizing,
        ]
    );
}
