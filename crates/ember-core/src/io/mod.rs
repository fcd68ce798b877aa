//! Reading band files and writing classification products.

pub mod band_files;
pub mod geotiff;
pub mod preview;
