use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::Array2;

use crate::classify::PixelClass;
use crate::error::Result;

/// Display color for each class in the quick-look image.
pub fn class_color(class: PixelClass) -> Rgb<u8> {
    match class {
        PixelClass::Background => Rgb([0, 0, 0]),
        PixelClass::DnFold => Rgb([255, 215, 0]),
        PixelClass::Fire => Rgb([255, 0, 0]),
        PixelClass::PotentialFire => Rgb([255, 140, 0]),
    }
}

/// Render the classified grid as an RGB image.
pub fn render_preview(classified: &Array2<u8>) -> RgbImage {
    let (h, w) = classified.dim();
    let mut img = RgbImage::new(w as u32, h as u32);
    for ((row, col), &v) in classified.indexed_iter() {
        let color = PixelClass::from_value(v)
            .map(class_color)
            .unwrap_or(Rgb([255, 0, 255]));
        img.put_pixel(col as u32, row as u32, color);
    }
    img
}

/// Save the quick-look as PNG.
pub fn save_preview(classified: &Array2<u8>, path: &Path) -> Result<()> {
    render_preview(classified).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
