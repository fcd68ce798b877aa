use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmberError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Landsat band {band} not loaded")]
    MissingBand { band: u8 },

    #[error("Landsat band {band} supplied more than once")]
    DuplicateBand { band: u8 },

    #[error("Band {band} has shape {found:?} (rows, cols) but band 1 has shape {expected:?}")]
    ShapeMismatch {
        band: u8,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Empty band grid")]
    EmptyGrid,

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("Unsupported TIFF sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<tiff::TiffError> for EmberError {
    fn from(e: tiff::TiffError) -> Self {
        EmberError::Tiff(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EmberError>;
