//! # palmsim-driver
//!
//! The run orchestrator: aggregates per-component configuration into one
//! [`SimConfig`], drives the daily/hourly stepping order across weather,
//! meteorology, soil water, photosynthesis, energy balance and crop, and
//! exposes the auxiliary attribute-path resolver and output-row format
//! consumed by `palmsim-cli`.

pub mod aux;
pub mod config;
pub mod driver;
pub mod output;

pub use config::{PlantPartSpec, SimConfig, SoilLayerSpec};
pub use driver::Driver;
pub use output::{LayerOutput, OutputRow};
