//! Georeferencing metadata carried from the input bands to every output.

use serde::{Deserialize, Serialize};

/// Affine transformation from pixel (col, row) to map (x, y) coordinates:
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    /// Usually negative for north-up images.
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation.
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// From GDAL ordering `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Map coordinates of a pixel corner. `(col, row) = (0, 0)` is the
    /// top-left corner of the first pixel; `(cols, rows)` is the bottom-right
    /// corner of the last.
    pub fn corner_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// True when the mapping flips orientation (the usual north-up case,
    /// where rows grow downward but y grows upward).
    pub fn flips_orientation(&self) -> bool {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation < 0.0
    }
}

impl Default for GeoTransform {
    /// Identity pixel-space transform (GDAL's default).
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Geospatial reference shared by all bands of a scene.
///
/// The GeoTIFF tag payloads are kept verbatim and re-emitted on every output
/// raster. Only the pixel-to-map transform is ever interpreted, for placing
/// polygon vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoReference {
    pub pixel_scale: Option<Vec<f64>>,
    pub tiepoint: Option<Vec<f64>>,
    pub model_transformation: Option<Vec<f64>>,
    pub geo_key_directory: Option<Vec<u16>>,
    pub geo_double_params: Option<Vec<f64>>,
    pub geo_ascii_params: Option<String>,
}

impl GeoReference {
    /// Reference that places pixels with the given transform and carries no CRS keys.
    pub fn from_transform(transform: &GeoTransform) -> Self {
        if transform.row_rotation == 0.0 && transform.col_rotation == 0.0 {
            Self {
                pixel_scale: Some(vec![transform.pixel_width, -transform.pixel_height, 0.0]),
                tiepoint: Some(vec![0.0, 0.0, 0.0, transform.origin_x, transform.origin_y, 0.0]),
                ..Default::default()
            }
        } else {
            let t = transform;
            Self {
                model_transformation: Some(vec![
                    t.pixel_width, t.row_rotation, 0.0, t.origin_x,
                    t.col_rotation, t.pixel_height, 0.0, t.origin_y,
                    0.0, 0.0, 0.0, 0.0,
                    0.0, 0.0, 0.0, 1.0,
                ]),
                ..Default::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Pixel-to-map transform, or the identity when the tags carry none.
    pub fn transform(&self) -> GeoTransform {
        if let (Some(scale), Some(tp)) = (&self.pixel_scale, &self.tiepoint) {
            if scale.len() >= 2 && tp.len() >= 6 {
                // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
                return GeoTransform::new(
                    tp[3] - tp[0] * scale[0],
                    tp[4] + tp[1] * scale[1],
                    scale[0],
                    -scale[1],
                );
            }
        }
        if let Some(m) = &self.model_transformation {
            if m.len() >= 8 {
                return GeoTransform {
                    origin_x: m[3],
                    pixel_width: m[0],
                    row_rotation: m[1],
                    origin_y: m[7],
                    col_rotation: m[4],
                    pixel_height: m[5],
                };
            }
        }
        GeoTransform::default()
    }
}
