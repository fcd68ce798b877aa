/// Number of reflective bands the classifier consumes (Landsat-8 OLI bands 1-7).
pub const BAND_COUNT: usize = 7;

/// Side length of the moving window used for local background statistics.
pub const WINDOW_SIZE: usize = 61;

/// Half-width of the moving window. Also the width of the unreliable border
/// that edge masking clears.
pub const WINDOW_RADIUS: usize = WINDOW_SIZE / 2;

/// Grids smaller than this in either dimension trigger the size warning.
pub const MIN_RELIABLE_DIMENSION: usize = WINDOW_SIZE;

// Unambiguous fire (Schroeder et al. 2016, test 1).

pub const FIRE_RATIO75_MIN: f32 = 2.5;
pub const FIRE_DIFF75_MIN: f32 = 0.3;
pub const FIRE_BAND7_MIN: f32 = 0.5;

// DN folding.

pub const DN_FOLD_BAND6_MIN: f32 = 0.8;
pub const DN_FOLD_BAND1_MAX: f32 = 0.2;
pub const DN_FOLD_BAND5_MIN: f32 = 0.4;
pub const DN_FOLD_BAND7_MAX: f32 = 0.1;

// Water.

pub const WATER_DIFF17_MAX: f32 = 0.2;

// Potential fire, direct thresholds.

pub const POTENTIAL_RATIO75_MIN: f32 = 1.8;
pub const POTENTIAL_DIFF75_MIN: f32 = 0.17;
pub const POTENTIAL_RATIO76_MIN: f32 = 1.6;

// Potential fire, adaptive thresholds.

/// Multiplier applied to local standard deviations.
pub const STDDEV_MULTIPLIER: f64 = 3.0;

/// Floor for the scaled band 7 standard deviation.
pub const BAND7_STDDEV_FLOOR: f64 = 0.08;

/// Floor for the scaled ratio75 standard deviation.
pub const RATIO75_STDDEV_FLOOR: f64 = 0.8;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Value written for TRUE pixels in exported mask rasters.
pub const MASK_TRUE_VALUE: u8 = 255;

// Output file suffixes appended to the scene base name.

pub const FIRE_MASK_SUFFIX: &str = "_FIRE_PIX.TIF";
pub const DN_FOLD_MASK_SUFFIX: &str = "_DN_FOLD_PIX.TIF";
pub const WATER_MASK_SUFFIX: &str = "_WATER_PIX.TIF";
pub const BACKGROUND_MASK_SUFFIX: &str = "_BACKGROUND_PIX.TIF";
pub const POTENTIAL_MASK_SUFFIX: &str = "_POTENTIAL_FIRE_PIX.TIF";
pub const CLASS_RASTER_SUFFIX: &str = "_CLASS_PIX.TIF";
pub const CLASS_PREVIEW_SUFFIX: &str = "_CLASS_PREVIEW.png";

/// File name of the polygon layer written to the output directory.
pub const VECTOR_FILE_NAME: &str = "Classified_Pixels.geojson";

/// Base name used when input file names share no common prefix.
pub const DEFAULT_BASE_NAME: &str = "scene";
