//! Procedural terrain: fractal noise heightfields, smoothing, erosion and meshing.
//!
//! The stages run strictly left to right:
//! noise → normalize → smooth → erode → mesh.

pub mod erosion;
pub mod error;
pub mod height_bands;
pub mod heightfield;
pub mod noise_field;
pub mod normalize;
pub mod pipeline;
pub mod smooth;
pub mod terrain;
pub mod worker;

pub use erosion::*;
pub use error::*;
pub use height_bands::*;
pub use heightfield::*;
pub use noise_field::{
    random_offset, CoherentNoise, NoiseParameters, PerlinSource, RawField, OFFSET_RANGE,
};
pub use normalize::*;
pub use pipeline::*;
pub use smooth::*;
pub use terrain::*;
pub use worker::*;
