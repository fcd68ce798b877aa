use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

use ember_core::band::SpectralBands;
use ember_core::georef::{GeoReference, GeoTransform};
use ember_core::scene::Scene;

/// Reflectances in band order 1..=7.
pub type Pixel = [f32; 7];

/// A pixel no detector flags: valid background with an unremarkable band 7.
pub const QUIET: Pixel = [0.1, 0.1, 0.1, 0.1, 0.3, 0.25, 0.1];

/// Build the seven bands from a per-pixel closure.
pub fn bands_from_fn<F>(rows: usize, cols: usize, f: F) -> SpectralBands
where
    F: Fn(usize, usize) -> Pixel,
{
    let grids: [Array2<f32>; 7] =
        std::array::from_fn(|b| Array2::from_shape_fn((rows, cols), |(r, c)| f(r, c)[b]));
    SpectralBands::new(grids).unwrap()
}

pub fn uniform_scene(rows: usize, cols: usize, pixel: Pixel) -> Scene {
    Scene::new(bands_from_fn(rows, cols, |_, _| pixel), GeoReference::default())
}

/// A single-pixel scene for exercising detector rules.
pub fn pixel_scene(pixel: Pixel) -> Scene {
    uniform_scene(1, 1, pixel)
}

/// Deterministic pseudo-random reflectances in `[0, 1)`, some exactly zero.
pub fn noisy_scene(rows: usize, cols: usize, seed: u64) -> Scene {
    let bands = bands_from_fn(rows, cols, |r, c| {
        let mut state = seed ^ ((r as u64) << 32 | c as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        std::array::from_fn(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let v = (state >> 40) as f32 / (1u64 << 24) as f32;
            if v < 0.05 {
                0.0
            } else {
                v
            }
        })
    });
    Scene::new(bands, GeoReference::default())
}

/// Write a single-band float GeoTIFF, optionally georeferenced.
pub fn write_f32_geotiff(path: &Path, data: &Array2<f32>, transform: Option<&GeoTransform>) {
    let (rows, cols) = data.dim();
    let file = BufWriter::new(File::create(path).unwrap());
    let mut encoder = TiffEncoder::new(file).unwrap();
    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .unwrap();
    if let Some(gt) = transform {
        let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        image
            .encoder()
            .write_tag(Tag::Unknown(33550), &scale[..])
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::Unknown(33922), &tiepoint[..])
            .unwrap();
    }
    let samples: Vec<f32> = data.iter().copied().collect();
    image.write_data(&samples).unwrap();
}

/// Write all seven bands as `<base>_B<n>.TIF` under `dir`.
pub fn write_band_files(
    dir: &Path,
    base: &str,
    bands: &SpectralBands,
    transform: Option<&GeoTransform>,
) -> Vec<PathBuf> {
    ember_core::band::BandId::ALL
        .iter()
        .map(|&id| {
            let path = dir.join(format!("{base}_B{}.TIF", id.number()));
            write_f32_geotiff(&path, bands.band(id), transform);
            path
        })
        .collect()
}

pub fn count_true(mask: &Array2<bool>) -> usize {
    mask.iter().filter(|&&v| v).count()
}
