//! # palmsim-core
//!
//! Shared primitives for the oil-palm stand simulation engine: the unified
//! error type, the tabulated-lookup and Gaussian-quadrature building blocks
//! reused by several components, and the simulation clock types.
//!
//! This crate carries no physiology; every downstream crate
//! (`palmsim-weather`, `palmsim-met`, `palmsim-energy`, `palmsim-photo`,
//! `palmsim-soil`, `palmsim-crop`, `palmsim-driver`) depends on it for
//! these shared building blocks rather than redefining them locally.

pub mod error;
pub mod quad;
pub mod table;
pub mod time;

pub use error::{Error, Result};
pub use quad::gauss_legendre;
pub use table::{parse_table_literal, Table};
pub use time::{Doy, SolarHour};

/// Von Kármán constant used throughout the energy-balance resistance network.
pub const VON_KARMAN: f64 = 0.4;

/// Molar mass of CH2O, used to convert photosynthesis rates to dry-matter mass.
pub const CH2O_MOLAR_MASS_G: f64 = 30.03;
