//! # palmsim-soil
//!
//! Layered soil-water balance: Saxton-Rawls pedotransfer functions,
//! Brooks-Corey matric head, root-zone dynamics, ET stress reduction and
//! explicit sub-daily integration of inter-layer fluxes.

pub mod layer;
pub mod profile;
pub mod texture;

pub use layer::SoilLayer;
pub use profile::{EtReduction, RootZoneAggregate, SoilProfileConfig, SoilWaterProfile};
pub use texture::{SoilWaterCharacteristic, Texture};
