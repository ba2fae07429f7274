//! # palmsim-crop
//!
//! The crop growth component: plant parts, maintenance respiration,
//! vegetative partition and growth, flower/bunch cohort boxcars, thinning
//! and yield accounting.

pub mod boxcar;
pub mod crop;
pub mod flower;
pub mod parts;

pub use boxcar::Boxcar;
pub use crop::{AssimilateSplit, Crop, CropConfig};
pub use flower::{Cohort, FlowerSex};
pub use parts::{PartKind, PlantPart};
