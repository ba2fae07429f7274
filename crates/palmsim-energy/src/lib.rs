//! # palmsim-energy
//!
//! Canopy/soil energy balance via the Shuttleworth-Wallace two-source
//! resistance-network model: friction velocity and wind profile, the six
//! named resistances, the combination flux solve, and canopy-temperature
//! recovery.

pub mod energy_balance;
pub mod flux;
pub mod resistances;

pub use energy_balance::{DailyImmutables, EnergyBalance, EnergyBalanceConfig, HourlyBalance};
pub use flux::{FluxInputs, FluxOutputs};
