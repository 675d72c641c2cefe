//! Artifact persistence, record normalization, and store loading.

pub mod artifact;
pub mod influx;
pub mod load;
pub mod normalize;
pub mod sink;
