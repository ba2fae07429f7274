//! Wind profile and the six-resistance electrical-network analogy
//! (`rsa`, `raa`, `rca`, `rst`, `rcs`, `rss`) of the canopy/soil/reference
//! system.
//!
//! Forms follow the classic Shuttleworth & Wallace (1985) two-source
//! combination model and its resistance naming.

use palmsim_core::{Error, VON_KARMAN};

/// Zero-plane displacement `d` and roughness length `z0` from tree height `h`.
pub fn wind_profile_params(tree_height: f64, k_d: f64, k_z: f64) -> (f64, f64) {
    (k_d * tree_height, k_z * tree_height)
}

/// Friction velocity from the log-law wind profile. Errors if `tree_height`
/// is at or above `ref_height` (the log term would be undefined or negative).
pub fn friction_velocity(
    ref_wind: f64,
    ref_height: f64,
    tree_height: f64,
    d: f64,
    z0: f64,
) -> Result<f64, Error> {
    if tree_height >= ref_height {
        return Err(Error::numerical(
            0,
            0.0,
            format!("reference height {ref_height} does not exceed tree height {tree_height}"),
        ));
    }
    let ln_term = ((ref_height - d) / z0).ln();
    Ok(VON_KARMAN * ref_wind / ln_term)
}

/// Wind speed at canopy top from the log-law profile.
pub fn wind_at_canopy_top(ustar: f64, tree_height: f64, d: f64, z0: f64) -> f64 {
    (ustar / VON_KARMAN) * ((tree_height - d) / z0).max(1.0).ln().max(0.01)
}

/// Soil-surface roughness length, taken as a small fixed fraction of tree height.
pub fn soil_roughness(tree_height: f64) -> f64 {
    (0.01 * tree_height).max(0.001)
}

/// `raa`: resistance between the mean canopy flow plane and the reference
/// height, and `rsa`: resistance between the soil surface and the mean
/// canopy flow plane (Shuttleworth & Wallace 1985, eqs. 4-5).
pub fn raa_rsa(
    ustar: f64,
    ref_height: f64,
    tree_height: f64,
    d: f64,
    z0: f64,
    eddy_ext: f64,
) -> (f64, f64) {
    let kh = (VON_KARMAN * ustar * (tree_height - d)).max(1e-6);
    let z0_soil = soil_roughness(tree_height);

    let raa = (1.0 / (VON_KARMAN * ustar)) * ((ref_height - d) / (tree_height - d)).max(1.0).ln()
        + (tree_height / (eddy_ext * kh))
            * ((eddy_ext * (1.0 - (d + z0) / tree_height)).exp() - 1.0);

    let rsa = (tree_height * eddy_ext.exp() / (eddy_ext * kh))
        * ((-eddy_ext * z0_soil / tree_height).exp() - (-eddy_ext * (d + z0) / tree_height).exp());

    (raa.max(0.0), rsa.max(0.0))
}

/// `rca`: bulk canopy boundary-layer resistance from leaflet dimensions and
/// wind speed at canopy top (Shuttleworth & Wallace 1985, eq. 6).
pub fn rca(wind_top: f64, leaf_width: f64, wind_ext: f64) -> f64 {
    let u_h = wind_top.max(0.1);
    (100.0 / wind_ext) * (leaf_width / u_h).sqrt() / (1.0 - (-wind_ext / 2.0).exp())
}

/// `rss`: soil resistance, increasing as the surface layer dries out.
pub fn rss(surface_vwc: f64, surface_sat: f64, rss_min: f64, rss_max: f64) -> f64 {
    let wetness = (surface_vwc / surface_sat.max(1e-6)).clamp(0.0, 1.0);
    rss_min + (rss_max - rss_min) * (1.0 - wetness)
}

/// Water stress factor on stomatal conductance: 1 at/above the critical
/// root-zone water content, decreasing linearly to 0 at PWP.
pub fn water_stress(vwc_root: f64, pwp: f64, critical: f64) -> f64 {
    if vwc_root >= critical {
        1.0
    } else {
        ((vwc_root - pwp) / (critical - pwp).max(1e-6)).clamp(0.0, 1.0)
    }
}

/// VPD stress factor: 1 below a threshold, decreasing above it.
pub fn vpd_stress(vpd_kpa: f64, threshold_kpa: f64, sensitivity: f64) -> f64 {
    if vpd_kpa <= threshold_kpa {
        1.0
    } else {
        (1.0 - sensitivity * (vpd_kpa - threshold_kpa)).clamp(0.0, 1.0)
    }
}

/// PAR stress factor: increasing (saturating) with absorbed PAR.
pub fn par_stress(absorbed_par: f64, half_sat_par: f64) -> f64 {
    (absorbed_par / (absorbed_par + half_sat_par.max(1e-6))).clamp(0.0, 1.0)
}

/// `rst`: stomatal resistance, unstressed minimum divided by the product of
/// the three stress reductions.
pub fn rst(rst_min: f64, f_water: f64, f_vpd: f64, f_par: f64) -> f64 {
    let denom = (f_water * f_vpd * f_par).max(1e-6);
    rst_min / denom
}

/// `rcs`: canopy resistance, `rst` divided by effective LAI (LAI saturating above a ceiling).
pub fn rcs(rst: f64, lai: f64, lai_ceiling: f64) -> f64 {
    let eff_lai = lai.min(lai_ceiling);
    if eff_lai <= 1e-9 {
        f64::INFINITY
    } else {
        rst / eff_lai
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friction_velocity_errors_when_tree_exceeds_reference() {
        assert!(friction_velocity(2.0, 5.0, 6.0, 4.0, 0.5).is_err());
    }

    #[test]
    fn friction_velocity_is_positive_for_valid_profile() {
        let (d, z0) = wind_profile_params(10.0, 0.75, 0.1);
        let ustar = friction_velocity(2.0, 25.0, 10.0, d, z0).unwrap();
        assert!(ustar > 0.0);
    }

    #[test]
    fn rss_increases_as_surface_dries() {
        let wet = rss(0.35, 0.40, 100.0, 2000.0);
        let dry = rss(0.10, 0.40, 100.0, 2000.0);
        assert!(dry > wet);
    }

    #[test]
    fn water_stress_is_one_at_critical_and_zero_at_pwp() {
        assert_eq!(water_stress(0.30, 0.10, 0.30), 1.0);
        assert_eq!(water_stress(0.10, 0.10, 0.30), 0.0);
    }

    #[test]
    fn par_stress_increases_with_light() {
        assert!(par_stress(500.0, 100.0) > par_stress(50.0, 100.0));
    }

    #[test]
    fn rcs_diverges_when_lai_is_zero() {
        assert!(rcs(100.0, 0.0, 6.0).is_infinite());
    }
}
