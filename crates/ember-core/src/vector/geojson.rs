use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::error::Result;

use super::polygonize::ClassPolygon;

/// Build a GeoJSON FeatureCollection with `Value` and `Class` properties.
///
/// Rings are closed and wound counter-clockwise for exteriors and clockwise
/// for holes, whatever the orientation of the source transform.
pub fn to_feature_collection(polygons: &[ClassPolygon]) -> Value {
    let features: Vec<Value> = polygons
        .iter()
        .map(|p| {
            let mut rings = Vec::with_capacity(1 + p.holes.len());
            rings.push(ring_coordinates(&p.exterior, true));
            rings.extend(p.holes.iter().map(|h| ring_coordinates(h, false)));
            json!({
                "type": "Feature",
                "properties": {
                    "Value": p.value(),
                    "Class": p.class.label(),
                    "Pixels": p.pixel_count,
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": rings,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write the polygon layer to `path`.
pub fn write_geojson(path: &Path, polygons: &[ClassPolygon]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &to_feature_collection(polygons))?;
    writer.flush()?;
    Ok(())
}

fn ring_coordinates(ring: &[(f64, f64)], counter_clockwise: bool) -> Vec<[f64; 2]> {
    let mut coords: Vec<[f64; 2]> = ring.iter().map(|&(x, y)| [x, y]).collect();
    if (signed_area(ring) > 0.0) != counter_clockwise {
        coords.reverse();
    }
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    coords
}

fn signed_area(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum::<f64>()
        / 2.0
}
