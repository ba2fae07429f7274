//! Canopy light-interception geometry: direct/diffuse extinction
//! coefficients, gap fraction, and the sunlit/shaded LAI split.

use palmsim_core::{gauss_legendre, Result};

/// Direct-beam extinction coefficient for a spherical leaf-angle
/// distribution, as a function of solar elevation.
pub fn k_dr(solar_elevation_rad: f64) -> f64 {
    let zenith_cos = solar_elevation_rad.sin().max(1.0e-3);
    0.5 / zenith_cos
}

/// Diffuse extinction coefficient: the direct coefficient integrated over
/// the sky hemisphere by 5-point Gauss-Legendre quadrature over zenith angle.
pub fn k_df(clump: f64) -> Result<f64> {
    let integral = gauss_legendre(5, 1.0e-3, std::f64::consts::FRAC_PI_2, |zenith| {
        let elevation = std::f64::consts::FRAC_PI_2 - zenith;
        k_dr(elevation) * zenith.sin() * zenith.cos()
    })?;
    // normalise by the hemisphere weight integral = 1/2
    Ok((integral / 0.5) * clump)
}

/// Fraction of ground area not covered by canopy, Beer's law in LAI/clump.
pub fn gap_fraction(k_dr: f64, lai: f64, clump: f64) -> f64 {
    (-k_dr * lai / clump.max(1.0e-6)).exp()
}

/// Sunlit and shaded LAI split (Goudriaan 1977): sunlit saturates with
/// increasing LAI while shaded grows roughly linearly.
pub fn lai_split(k_dr: f64, lai: f64) -> (f64, f64) {
    let sunlit = (1.0 - (-k_dr * lai).exp()) / k_dr.max(1.0e-6);
    let sunlit = sunlit.min(lai);
    let shaded = (lai - sunlit).max(0.0);
    (sunlit, shaded)
}

/// Canopy reflection coefficients for direct (`pdr`) and diffuse (`pdf`)
/// beams from leaf scattering coefficient and solar elevation.
pub fn reflection_coefficients(leaf_scatter: f64, solar_elevation_rad: f64) -> (f64, f64) {
    let rho_h = (1.0 - leaf_scatter.sqrt()) / (1.0 + leaf_scatter.sqrt());
    let k_dr_val = k_dr(solar_elevation_rad);
    let pdr = 2.0 * rho_h / (1.0 + 1.6 * k_dr_val.min(5.0));
    let pdf = rho_h * 1.1;
    (pdr.clamp(0.0, 1.0), pdf.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_dr_decreases_as_sun_rises() {
        let low = k_dr(0.1);
        let high = k_dr(1.5);
        assert!(high < low);
    }

    #[test]
    fn lai_split_sums_to_total() {
        let k = k_dr(1.0);
        let (sunlit, shaded) = lai_split(k, 4.0);
        assert!((sunlit + shaded - 4.0).abs() < 1e-9);
    }

    #[test]
    fn lai_split_at_zero_lai_is_zero() {
        let k = k_dr(1.0);
        let (sunlit, shaded) = lai_split(k, 0.0);
        assert_eq!(sunlit, 0.0);
        assert_eq!(shaded, 0.0);
    }

    #[test]
    fn gap_fraction_decreases_with_lai() {
        let k = k_dr(1.0);
        let sparse = gap_fraction(k, 1.0, 1.0);
        let dense = gap_fraction(k, 6.0, 1.0);
        assert!(dense < sparse);
    }

    #[test]
    fn reflection_coefficients_in_unit_range() {
        let (pdr, pdf) = reflection_coefficients(0.2, 1.0);
        assert!((0.0..=1.0).contains(&pdr));
        assert!((0.0..=1.0).contains(&pdf));
    }
}
