pub mod band;
pub mod classify;
pub mod consts;
pub mod detection;
pub mod error;
pub mod georef;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod scene;
pub mod vector;
