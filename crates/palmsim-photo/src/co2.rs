//! Ambient CO2 trend: a smooth curve fitted to historical observations,
//! linearly extrapolated beyond the fit range. Reset once per year.

/// Years and corresponding annual-mean CO2 (ppm) anchoring the fit, roughly
/// tracking the Mauna Loa record.
const TREND_YEARS: [f64; 6] = [1960.0, 1980.0, 2000.0, 2010.0, 2020.0, 2024.0];
const TREND_PPM: [f64; 6] = [317.0, 338.7, 369.5, 389.9, 414.2, 422.8];

/// Ambient CO2 (ppm) for `year`: piecewise-linear interpolation across the
/// anchor points, and linear extrapolation from the last segment's slope
/// beyond either end.
pub fn ambient_co2_for_year(year: f64) -> f64 {
    if year <= TREND_YEARS[0] {
        let slope = (TREND_PPM[1] - TREND_PPM[0]) / (TREND_YEARS[1] - TREND_YEARS[0]);
        return TREND_PPM[0] + slope * (year - TREND_YEARS[0]);
    }
    let last = TREND_YEARS.len() - 1;
    if year >= TREND_YEARS[last] {
        let slope = (TREND_PPM[last] - TREND_PPM[last - 1]) / (TREND_YEARS[last] - TREND_YEARS[last - 1]);
        return TREND_PPM[last] + slope * (year - TREND_YEARS[last]);
    }
    for i in 0..last {
        if year >= TREND_YEARS[i] && year <= TREND_YEARS[i + 1] {
            let frac = (year - TREND_YEARS[i]) / (TREND_YEARS[i + 1] - TREND_YEARS[i]);
            return TREND_PPM[i] + frac * (TREND_PPM[i + 1] - TREND_PPM[i]);
        }
    }
    TREND_PPM[last]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_anchor_points_exactly() {
        for (y, p) in TREND_YEARS.iter().zip(TREND_PPM.iter()) {
            assert!((ambient_co2_for_year(*y) - p).abs() < 1e-9);
        }
    }

    #[test]
    fn extrapolates_upward_past_last_anchor() {
        let past = ambient_co2_for_year(2030.0);
        assert!(past > TREND_PPM[TREND_PPM.len() - 1]);
    }

    #[test]
    fn extrapolates_before_first_anchor() {
        let before = ambient_co2_for_year(1950.0);
        assert!(before < TREND_PPM[0]);
    }

    #[test]
    fn is_monotonically_increasing_across_the_fit() {
        let mut prev = ambient_co2_for_year(1960.0);
        let mut y = 1965.0;
        while y <= 2024.0 {
            let cur = ambient_co2_for_year(y);
            assert!(cur >= prev - 1e-9);
            prev = cur;
            y += 5.0;
        }
    }
}
