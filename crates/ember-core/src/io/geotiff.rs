//! Single-band GeoTIFF reading and writing.
//!
//! Only the georeferencing tags are interpreted on read, and they are
//! written back unchanged, so outputs line up with the input bands in any
//! GIS without this crate understanding the coordinate system.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray8;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tiff::ColorType;

use crate::consts::MASK_TRUE_VALUE;
use crate::error::{EmberError, Result};
use crate::georef::GeoReference;
use crate::pipeline::config::ReflectanceScaling;

const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const MODEL_TRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;
const GEO_DOUBLE_PARAMS: Tag = Tag::GeoDoubleParamsTag;
const GEO_ASCII_PARAMS: Tag = Tag::GeoAsciiParamsTag;

/// One band read from disk.
#[derive(Clone, Debug)]
pub struct RasterBand {
    pub data: Array2<f32>,
    pub georef: GeoReference,
}

/// Read the first image of a GeoTIFF as `f32`, applying `scaling`.
///
/// The file handle is released before this returns.
pub fn read_band(path: &Path, scaling: &ReflectanceScaling) -> Result<RasterBand> {
    let file = File::open(path)?;
    let mut band = decode_band(BufReader::new(file))?;
    if !scaling.is_identity() {
        band.data.mapv_inplace(|v| scaling.apply(v));
    }
    Ok(band)
}

/// Decode a single-band TIFF from any `Read + Seek` source.
pub fn decode_band<R: Read + Seek>(reader: R) -> Result<RasterBand> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => {
            return Err(EmberError::UnsupportedSampleFormat(format!(
                "{other:?} (expected a single-band grayscale raster)"
            )))
        }
    }

    let georef = read_georeference(&mut decoder);

    let data: Vec<f32> = match decoder.read_image()? {
        DecodingResult::U8(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(EmberError::UnsupportedSampleFormat(
                "unrecognized TIFF sample type".into(),
            ))
        }
    };

    let data = Array2::from_shape_vec((height as usize, width as usize), data)
        .map_err(|e| EmberError::Tiff(format!("sample count does not match dimensions: {e}")))?;
    Ok(RasterBand { data, georef })
}

fn read_georeference<R: Read + Seek>(decoder: &mut Decoder<R>) -> GeoReference {
    GeoReference {
        pixel_scale: decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).ok(),
        tiepoint: decoder.get_tag_f64_vec(MODEL_TIEPOINT).ok(),
        model_transformation: decoder.get_tag_f64_vec(MODEL_TRANSFORMATION).ok(),
        geo_key_directory: decoder.get_tag_u16_vec(GEO_KEY_DIRECTORY).ok(),
        geo_double_params: decoder.get_tag_f64_vec(GEO_DOUBLE_PARAMS).ok(),
        geo_ascii_params: decoder.get_tag_ascii_string(GEO_ASCII_PARAMS).ok(),
    }
}

/// Write a boolean mask as an 8-bit raster with TRUE stored as 255.
pub fn write_mask(path: &Path, mask: &Array2<bool>, georef: &GeoReference) -> Result<()> {
    let bytes = mask.mapv(|v| if v { MASK_TRUE_VALUE } else { 0 });
    write_u8(path, &bytes, georef)
}

/// Write the classified grid as an 8-bit raster.
pub fn write_classified(path: &Path, classified: &Array2<u8>, georef: &GeoReference) -> Result<()> {
    write_u8(path, classified, georef)
}

/// Write any 8-bit grid with the given georeference.
pub fn write_u8(path: &Path, data: &Array2<u8>, georef: &GeoReference) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    encode_u8(data, georef, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Encode an 8-bit grid into any `Write + Seek` sink.
pub fn encode_u8<W: Write + Seek>(
    data: &Array2<u8>,
    georef: &GeoReference,
    writer: W,
) -> Result<()> {
    let (rows, cols) = data.dim();
    let mut encoder = TiffEncoder::new(writer)?;
    let mut image = encoder.new_image::<Gray8>(cols as u32, rows as u32)?;

    {
        let dir = image.encoder();
        if let Some(scale) = &georef.pixel_scale {
            dir.write_tag(MODEL_PIXEL_SCALE, scale.as_slice())?;
        }
        if let Some(tiepoint) = &georef.tiepoint {
            dir.write_tag(MODEL_TIEPOINT, tiepoint.as_slice())?;
        }
        if let Some(matrix) = &georef.model_transformation {
            dir.write_tag(MODEL_TRANSFORMATION, matrix.as_slice())?;
        }
        if let Some(keys) = &georef.geo_key_directory {
            dir.write_tag(GEO_KEY_DIRECTORY, keys.as_slice())?;
        }
        if let Some(doubles) = &georef.geo_double_params {
            dir.write_tag(GEO_DOUBLE_PARAMS, doubles.as_slice())?;
        }
        if let Some(ascii) = &georef.geo_ascii_params {
            dir.write_tag(GEO_ASCII_PARAMS, ascii.as_str())?;
        }
    }

    let samples = data.as_standard_layout();
    let samples = samples
        .as_slice()
        .ok_or_else(|| EmberError::Tiff("grid is not contiguous".into()))?;
    image.write_data(samples)?;
    Ok(())
}
