//! Diurnal interpolation of temperature, wind, radiation and humidity.

use std::f64::consts::PI;

/// Instantaneous air temperature: cosine curve between daily `tmin` and
/// `tmax`, minimum `lag` hours after sunrise, maximum in early afternoon
/// (taken as 3 hours past solar noon, a common agrometeorological default).
pub fn instantaneous_temperature(hour: f64, tmin: f64, tmax: f64, sunrise: f64, lag: f64) -> f64 {
    let t_min_time = sunrise + lag;
    let t_max_time = 15.0; // 3pm solar time
    let period = 24.0;
    let mean = (tmax + tmin) / 2.0;
    let amp = (tmax - tmin) / 2.0;
    if hour >= t_min_time && hour <= t_max_time {
        mean - amp * (PI * (hour - t_min_time) / (t_max_time - t_min_time)).cos()
    } else {
        // Between afternoon max and next day's min: cosine decay back down.
        let wrapped = if hour < t_min_time { hour + period } else { hour };
        let span = period - (t_max_time - t_min_time);
        let frac = (wrapped - t_max_time) / span;
        mean + amp * (PI * frac).cos()
    }
}

/// Wind speed varies sinusoidally between a daytime high and a pre-sunrise
/// low governed by the daily mean and `lag`.
pub fn instantaneous_wind(hour: f64, mean_wind: f64, sunrise: f64, lag: f64) -> f64 {
    let low_time = sunrise - lag;
    let high_time = 14.0;
    let amp = mean_wind * 0.5;
    let period = 24.0;
    let t = if hour >= low_time {
        hour - low_time
    } else {
        hour + period - low_time
    };
    let half_span = ((high_time - low_time).rem_euclid(period)).max(1e-6);
    let wind = if t <= half_span {
        mean_wind - amp * (PI * t / half_span).cos()
    } else {
        let frac = (t - half_span) / (period - half_span).max(1e-6);
        mean_wind + amp * (PI * frac).cos()
    };
    wind.max(0.0)
}

/// Saturated vapour pressure (kPa) from air temperature (°C), Tetens form.
pub fn svp_kpa(temp_c: f64) -> f64 {
    0.6108 * ((17.27 * temp_c) / (temp_c + 237.3)).exp()
}

/// Slope of the SVP curve (kPa/°C) at `temp_c`, the derivative of [`svp_kpa`].
pub fn svp_slope_kpa_per_c(temp_c: f64) -> f64 {
    4098.0 * svp_kpa(temp_c) / (temp_c + 237.3).powi(2)
}

/// Actual vapour pressure (kPa) from a dew-point-like temperature.
pub fn actual_vp_kpa(dew_temp_c: f64) -> f64 {
    svp_kpa(dew_temp_c)
}

/// VPD (kPa) and RH (%) given air temperature and actual vapour pressure.
pub fn vpd_and_rh(temp_c: f64, avp_kpa: f64) -> (f64, f64) {
    let svp = svp_kpa(temp_c);
    let vpd = (svp - avp_kpa).max(0.0);
    let rh = (avp_kpa / svp * 100.0).clamp(0.0, 100.0);
    (vpd, rh)
}

/// Instantaneous total/direct/diffuse radiation (W/m^2) from daily values, a
/// sinusoidal profile over daylight hours; the direct/diffuse split follows
/// the daily ratio.
pub fn instantaneous_radiation(
    hour: f64,
    sunrise: f64,
    sunset: f64,
    daily_total_mj: f64,
    diffuse_fraction: f64,
) -> (f64, f64, f64) {
    if hour <= sunrise || hour >= sunset {
        return (0.0, 0.0, 0.0);
    }
    let daylength = sunset - sunrise;
    // Integral of sin(pi*(h-sunrise)/daylength) over [sunrise,sunset] = 2*daylength/pi.
    let peak_w_m2 = daily_total_mj * 1.0e6 / (daylength * 3600.0) * (PI / 2.0);
    let shape = (PI * (hour - sunrise) / daylength).sin().max(0.0);
    let total = peak_w_m2 * shape;
    let diffuse = total * diffuse_fraction;
    let direct = total - diffuse;
    (total, direct, diffuse)
}

/// Net radiation (MJ/m^2/hr, converted internally to match `total_rad` units)
/// from total radiation and a long-wave balance parameterised by vapour
/// pressure, air temperature, and a net-radiation coefficient.
pub fn net_radiation(total_rad_w_m2: f64, avp_kpa: f64, air_temp_c: f64, albedo: f64, net_long_coeff: f64) -> f64 {
    const STEFAN_BOLTZMANN: f64 = 5.67e-8; // W/m^2/K^4
    let net_short = (1.0 - albedo) * total_rad_w_m2;
    let temp_k = air_temp_c + 273.15;
    let net_long = net_long_coeff * STEFAN_BOLTZMANN * temp_k.powi(4) * (0.34 - 0.14 * avp_kpa.sqrt());
    net_short - net_long
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svp_increases_with_temperature() {
        assert!(svp_kpa(30.0) > svp_kpa(20.0));
    }

    #[test]
    fn vpd_is_nonnegative() {
        let (vpd, rh) = vpd_and_rh(30.0, svp_kpa(30.0) + 1.0);
        assert_eq!(vpd, 0.0);
        assert!(rh <= 100.0);
    }

    #[test]
    fn radiation_is_zero_outside_daylight() {
        let (total, direct, diffuse) = instantaneous_radiation(3.0, 6.0, 18.0, 20.0, 0.3);
        assert_eq!((total, direct, diffuse), (0.0, 0.0, 0.0));
    }

    #[test]
    fn radiation_is_positive_at_midday() {
        let (total, direct, diffuse) = instantaneous_radiation(12.0, 6.0, 18.0, 20.0, 0.3);
        assert!(total > 0.0);
        assert!(direct > 0.0 && diffuse > 0.0);
        assert!((direct + diffuse - total).abs() < 1e-9);
    }

    #[test]
    fn wind_stays_nonnegative() {
        for h in 0..24 {
            assert!(instantaneous_wind(h as f64, 3.0, 6.0, 1.0) >= 0.0);
        }
    }
}
