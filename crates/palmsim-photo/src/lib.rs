//! # palmsim-photo
//!
//! Canopy photosynthesis: light-interception geometry, PAR decomposition,
//! Farquhar-style leaf assimilation, and whole-canopy integration.

pub mod canopy;
pub mod co2;
pub mod leaf;
pub mod par;
pub mod photosynthesis;

pub use photosynthesis::{DailyPhoto, InstantPhoto, Photosynthesis, PhotosynthesisConfig};
