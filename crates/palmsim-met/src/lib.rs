//! # palmsim-met
//!
//! Meteorology component: solar astronomy and diurnal interpolation of
//! temperature, wind, radiation and humidity.

pub mod astronomy;
pub mod diurnal;
pub mod meteorology;

pub use meteorology::{DailyMet, InstantMet, Meteorology, MeteorologyConfig};
