//! Unified error type shared by every simulation crate.
//!
//! Each downstream crate (`palmsim-weather`, `palmsim-soil`, ...) reuses
//! [`Error`] directly rather than minting its own enum, since the failure
//! modes (bad input, numerical-domain violations, quadrature/lookup
//! failures, boxcar underflow, state violations) cut across component
//! boundaries.

use thiserror::Error;

/// Unified error type for the simulation engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing/unreadable file, unknown key, or out-of-range parameter.
    #[error("input error: {0}")]
    Input(String),

    /// A numerical domain failure with no physical fallback available.
    #[error("numerical domain error at day {doy}, hour {hour:.2}: {message}")]
    Numerical {
        doy: u16,
        hour: f64,
        message: String,
    },

    /// Gaussian quadrature order outside [1,9], or an empty lookup table.
    #[error("quadrature/lookup error: {0}")]
    Quadrature(String),

    /// A boxcar cohort was requested beyond the configured length.
    #[error("boxcar underflow: {0}")]
    Boxcar(String),

    /// A layer's water content fell outside [pwp, sat] after clamping.
    #[error("state violation: {0}")]
    State(String),

    /// I/O errors (file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing errors from the weather file reader.
    #[error("CSV error: {0}")]
    Csv(String),
}

/// Convenience alias used throughout the simulation crates.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn numerical(doy: u16, hour: f64, message: impl Into<String>) -> Self {
        Error::Numerical {
            doy,
            hour,
            message: message.into(),
        }
    }
}
