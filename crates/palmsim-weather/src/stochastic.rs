//! Stochastic weather generator: samples daily rain/temperature/wind from
//! fitted monthly distributions.
//!
//! Month-of-year for a given DOY is derived from cumulative month lengths,
//! 0-based (`month = 0..=11`) — pinned explicitly since callers otherwise
//! disagree on whether January is month 0 or month 1.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Weibull};

use palmsim_core::{Doy, Error, Result};

use crate::annual::WeatherRecord;
use crate::source::WeatherSource;

const MONTH_DAYS: [u16; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Monthly-fitted parameters for the Markov-chain rain / harmonic temperature
/// / Weibull wind generator.
#[derive(Debug, Clone)]
pub struct MonthlyParams {
    /// P(wet | previous day wet), per month.
    pub pww: [f64; 12],
    /// P(wet | previous day dry), per month.
    pub pwd: [f64; 12],
    /// Gamma shape for rain amount on wet days, per month.
    pub gamma_shape: [f64; 12],
    /// Gamma scale (mm) for rain amount on wet days, per month.
    pub gamma_scale: [f64; 12],
    /// Annual-mean temperature per month (°C).
    pub temp_mean: [f64; 12],
    /// Seasonal amplitude of the mean, per month (°C).
    pub temp_amp: [f64; 12],
    /// Coefficient of variation of the daily perturbation, per month.
    pub temp_cv: [f64; 12],
    /// Seasonal amplitude of the CV, per month.
    pub temp_ampcv: [f64; 12],
    /// Mean temperature on wet days, per month (°C); replaces `temp_mean` when wet.
    pub temp_meanwet: [f64; 12],
    /// Weibull shape for daily mean wind speed, per month.
    pub wind_shape: [f64; 12],
    /// Weibull scale (m/s) for daily mean wind speed, per month.
    pub wind_scale: [f64; 12],
}

fn month_of_doy(doy: u16) -> usize {
    let mut remaining = doy.saturating_sub(1);
    for (i, &len) in MONTH_DAYS.iter().enumerate() {
        if remaining < len {
            return i;
        }
        remaining -= len;
    }
    11
}

/// Seasonal harmonic, peaking at day 15 (mid-January), one cycle per year.
fn seasonal_factor(doy: u16) -> f64 {
    let phase = (doy as f64 - 15.0) / 365.0 * std::f64::consts::TAU;
    phase.cos()
}

pub struct StochasticWeatherGenerator {
    params: MonthlyParams,
    rng: StdRng,
    doy: u16,
    nsets: usize,
    prev_wet: bool,
}

impl StochasticWeatherGenerator {
    /// `seed > 0` seeds deterministically; otherwise the generator is entropy-seeded.
    pub fn new(params: MonthlyParams, seed: i64) -> Self {
        let rng = if seed > 0 {
            StdRng::seed_from_u64(seed as u64)
        } else {
            StdRng::from_entropy()
        };
        StochasticWeatherGenerator {
            params,
            rng,
            doy: 1,
            nsets: Doy::DAYS_PER_YEAR as usize,
            prev_wet: false,
        }
    }

    fn sample_day(&mut self) -> Result<WeatherRecord> {
        let month = month_of_doy(self.doy);
        let p_wet = if self.prev_wet {
            self.params.pww[month]
        } else {
            self.params.pwd[month]
        };
        let draw: f64 = self.rng.gen();
        let wet = draw < p_wet;

        let rain = if wet {
            let gamma = Gamma::new(self.params.gamma_shape[month], self.params.gamma_scale[month])
                .map_err(|e| Error::Input(format!("invalid gamma rain parameters: {e}")))?;
            gamma.sample(&mut self.rng)
        } else {
            0.0
        };

        let season = seasonal_factor(self.doy);
        let base_mean = if wet {
            self.params.temp_meanwet[month]
        } else {
            self.params.temp_mean[month]
        } + self.params.temp_amp[month] * season;
        let cv = self.params.temp_cv[month] + self.params.temp_ampcv[month] * season;
        let perturb: f64 = self.rng.gen_range(-1.0..1.0) * cv.abs() * base_mean.abs().max(1.0);
        let tmean = base_mean + perturb;
        let spread = (cv.abs() * base_mean.abs().max(1.0) / 2.0).max(0.5);
        let mut tmax = tmean + spread;
        let mut tmin = tmean - spread;
        if tmax < tmin {
            std::mem::swap(&mut tmax, &mut tmin);
        }

        let weibull = Weibull::new(self.params.wind_scale[month], self.params.wind_shape[month])
            .map_err(|e| Error::Input(format!("invalid Weibull wind parameters: {e}")))?;
        let wind = weibull.sample(&mut self.rng);

        self.prev_wet = wet;

        let mut record = WeatherRecord::new();
        record.insert("tmin".into(), tmin);
        record.insert("tmax".into(), tmax);
        record.insert("wind".into(), wind);
        record.insert("rain".into(), rain);
        Ok(record)
    }
}

impl WeatherSource for StochasticWeatherGenerator {
    fn next_day(&mut self) -> Result<WeatherRecord> {
        let record = self.sample_day()?;
        let (next, _wrapped) = Doy::new(self.doy).advance();
        self.doy = next.value();
        Ok(record)
    }

    fn nsets(&self) -> usize {
        self.nsets
    }
}
