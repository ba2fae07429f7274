//! # palmsim-weather
//!
//! Weather sources for the oil-palm simulation: the annual weather table,
//! the `WeatherSource` capability trait, a cyclic CSV file reader, and a
//! stochastic Markov-chain/Weibull generator.

pub mod annual;
pub mod file_reader;
pub mod source;
pub mod stochastic;

pub use annual::{AnnualWeather, WeatherRecord};
pub use file_reader::{WeatherFile, WeatherFileReader};
pub use source::WeatherSource;
pub use stochastic::{MonthlyParams, StochasticWeatherGenerator};
