//! Vectorization of the classified raster into class polygons.

pub mod geojson;
pub mod polygonize;
pub mod regions;

pub use geojson::{to_feature_collection, write_geojson};
pub use polygonize::{polygonize, ClassPolygon};
pub use regions::{label_regions, Region, RegionMap};
