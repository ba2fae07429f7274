//! Weather source capability: produces, on demand, the next day's record.

use crate::annual::WeatherRecord;
use palmsim_core::Result;

/// A capability producing the next day's weather record on demand.
///
/// Two implementations exist: [`crate::file_reader::WeatherFileReader`]
/// (cyclic file-backed reader) and [`crate::stochastic::StochasticWeatherGenerator`].
pub trait WeatherSource {
    /// Produce the next day's record, advancing internal day-of-year bookkeeping.
    fn next_day(&mut self) -> Result<WeatherRecord>;

    /// Number of records per year (defaults to 365 across implementations).
    fn nsets(&self) -> usize;
}
