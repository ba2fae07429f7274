//! Meteorology component: per-day astronomy plus per-hour diurnal
//! interpolation of temperature, wind, radiation and humidity.

use palmsim_core::{Doy, Result, SolarHour};
use palmsim_weather::WeatherRecord;

use crate::astronomy;
use crate::diurnal;

/// Site/station-level configuration, fixed for the life of a run.
#[derive(Debug, Clone)]
pub struct MeteorologyConfig {
    pub lat_deg: f64,
    pub station_height_m: f64,
    /// Hours between sunrise and the daily temperature/wind minimum.
    pub lag_hours: f64,
    /// Angstrom-Prescott coefficients translating sunshine-hour fraction to
    /// daily total radiation: `Rs = (a + b * n/N) * Ra`.
    pub angstrom_a: f64,
    pub angstrom_b: f64,
    pub albedo: f64,
    pub net_long_coeff: f64,
}

impl Default for MeteorologyConfig {
    fn default() -> Self {
        MeteorologyConfig {
            lat_deg: 3.0,
            station_height_m: 2.0,
            lag_hours: 1.0,
            angstrom_a: 0.25,
            angstrom_b: 0.50,
            albedo: 0.23,
            net_long_coeff: 1.0,
        }
    }
}

/// Quantities computed once per day.
#[derive(Debug, Clone, Default)]
pub struct DailyMet {
    pub tmin: f64,
    pub tmax: f64,
    pub wind_mean: f64,
    pub rain: f64,
    pub sunhr: f64,
    pub declination: f64,
    pub sunrise: f64,
    pub sunset: f64,
    pub daylength: f64,
    pub et_rad: f64,
    pub total_rad: f64,
    pub diffuse_fraction: f64,
}

/// Quantities recomputed on every solar-hour change.
#[derive(Debug, Clone, Default)]
pub struct InstantMet {
    pub hour: f64,
    pub inc: f64,
    pub hgt: f64,
    pub azi: f64,
    pub et_rad: f64,
    pub total_rad: f64,
    pub direct_rad: f64,
    pub diffuse_rad: f64,
    pub air_temp: f64,
    pub svp: f64,
    pub avp: f64,
    pub vpd: f64,
    pub rh: f64,
    pub net_rad: f64,
    pub wind: f64,
}

/// The meteorology component: owns the current day/hour and every quantity
/// derived from them.
#[derive(Debug, Clone)]
pub struct Meteorology {
    pub config: MeteorologyConfig,
    pub doy: Doy,
    pub hour: SolarHour,
    pub daily: DailyMet,
    pub instant: InstantMet,
}

impl Meteorology {
    pub fn new(config: MeteorologyConfig) -> Self {
        Meteorology {
            config,
            doy: Doy::default(),
            hour: SolarHour::default(),
            daily: DailyMet::default(),
            instant: InstantMet::default(),
        }
    }

    /// Recompute all per-day quantities from the current day's weather record.
    /// Returns the ordinal day-of-year (for dependents keyed off DOY, not the
    /// year-wrap flag — that is decided by the weather source upstream).
    pub fn set_day(&mut self, doy: Doy, weather: &WeatherRecord) -> Result<u16> {
        self.doy = doy;
        let declination = astronomy::declination_rad(doy.value());
        let (sunrise, sunset, daylength) = astronomy::sun_times(self.config.lat_deg, declination);
        let dr = astronomy::eccentricity_correction(doy.value());
        let et_rad = astronomy::daily_et_radiation(self.config.lat_deg, declination, sunset, dr);

        let sunhr = weather.get("sunhr").copied().unwrap_or(daylength * 0.6);
        let total_rad = (self.config.angstrom_a + self.config.angstrom_b * (sunhr / daylength.max(1e-6)))
            * et_rad;
        let diffuse_fraction = (1.0 - (total_rad / et_rad.max(1e-6)).clamp(0.0, 1.0)).clamp(0.1, 1.0);

        self.daily = DailyMet {
            tmin: weather.get("tmin").copied().unwrap_or(22.0),
            tmax: weather.get("tmax").copied().unwrap_or(32.0),
            wind_mean: weather.get("wind").copied().unwrap_or(2.0),
            rain: weather.get("rain").copied().unwrap_or(0.0),
            sunhr,
            declination,
            sunrise,
            sunset,
            daylength,
            et_rad,
            total_rad,
            diffuse_fraction,
        };
        Ok(doy.value())
    }

    /// Recompute all instantaneous quantities for `hour`.
    pub fn set_hour(&mut self, hour: SolarHour) -> Result<()> {
        self.hour = hour;
        let h = hour.value();
        let d = &self.daily;
        let (inc, hgt, azi) = astronomy::sun_position(self.config.lat_deg, d.declination, h);
        let (total_rad, direct_rad, diffuse_rad) =
            diurnal::instantaneous_radiation(h, d.sunrise, d.sunset, d.total_rad, d.diffuse_fraction);
        let (et_rad_inst, _, _) =
            diurnal::instantaneous_radiation(h, d.sunrise, d.sunset, d.et_rad, 0.0);
        let air_temp =
            diurnal::instantaneous_temperature(h, d.tmin, d.tmax, d.sunrise, self.config.lag_hours);
        let svp = diurnal::svp_kpa(air_temp);
        // Dew-point approximated at tmin, the classic FAO-56 assumption absent direct humidity data.
        let avp = diurnal::actual_vp_kpa(d.tmin);
        let (vpd, rh) = diurnal::vpd_and_rh(air_temp, avp.min(svp));
        let net_rad = diurnal::net_radiation(
            total_rad,
            avp,
            air_temp,
            self.config.albedo,
            self.config.net_long_coeff,
        );
        let wind = diurnal::instantaneous_wind(h, d.wind_mean, d.sunrise, self.config.lag_hours);

        self.instant = InstantMet {
            hour: h,
            inc,
            hgt,
            azi,
            et_rad: et_rad_inst,
            total_rad,
            direct_rad,
            diffuse_rad,
            air_temp,
            svp,
            avp,
            vpd,
            rh,
            net_rad,
            wind,
        };
        Ok(())
    }
}
