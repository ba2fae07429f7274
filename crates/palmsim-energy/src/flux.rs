//! Shuttleworth-Wallace two-source combination: given available energy split
//! between crop and soil and the six network resistances, solve the coupled
//! latent-heat fluxes and recover canopy temperature.

/// Psychrometric constant (kPa/°C) at standard atmospheric pressure.
pub const PSYCHROMETRIC_CONSTANT: f64 = 0.066;

/// Air density (kg/m^3) and specific heat (MJ/kg/°C) at typical tropical
/// lowland conditions, combined into the `rho*cp` term used throughout.
pub const RHO_CP: f64 = 1.2 * 1.013e-3;

/// Inputs to one solve of the two-source combination equations.
#[derive(Debug, Clone, Copy)]
pub struct FluxInputs {
    pub available_energy_total: f64,
    pub available_energy_soil: f64,
    pub vpd_kpa: f64,
    pub svp_slope: f64,
    pub raa: f64,
    pub rsa: f64,
    pub rca: f64,
    pub rcs: f64,
    pub rss: f64,
}

/// Resolved fluxes (all W/m^2) and the effective surface vapour-pressure
/// deficit at the mean canopy flow plane used for canopy-temperature recovery.
#[derive(Debug, Clone, Copy)]
pub struct FluxOutputs {
    pub latent_crop: f64,
    pub latent_soil: f64,
    pub latent_total: f64,
    pub sensible_crop: f64,
    pub sensible_soil: f64,
    pub sensible_total: f64,
}

/// Solve the Shuttleworth-Wallace combination equations for crop and soil
/// latent heat flux, then close the energy budget for sensible heat.
pub fn solve(inputs: &FluxInputs) -> FluxOutputs {
    let FluxInputs {
        available_energy_total: a,
        available_energy_soil: a_s,
        vpd_kpa: d0,
        svp_slope: delta,
        raa,
        rsa,
        rca,
        rcs,
        rss,
    } = *inputs;

    let gamma = PSYCHROMETRIC_CONSTANT;
    let rho_cp = RHO_CP;

    // PM-style combination resistance terms (Shuttleworth & Wallace 1985, eqs. 11-12).
    let pm_c_num = delta * a + (rho_cp * d0 - delta * rca * a_s) / (raa + rca);
    let pm_c_den = delta + gamma * (1.0 + rcs / (raa + rca));
    let pmc = pm_c_num / pm_c_den;

    let pm_s_num = delta * a + (rho_cp * d0 - delta * rsa * (a - a_s)) / (raa + rsa);
    let pm_s_den = delta + gamma * (1.0 + rss / (raa + rsa));
    let pms = pm_s_num / pm_s_den;

    let rc_star = (delta + gamma) * raa + gamma * rcs;
    let rs_star = (delta + gamma) * raa + gamma * rss;
    let ra_star = (delta + gamma) * raa;

    // Combination weights (Shuttleworth & Wallace 1985, eqs. 11-12):
    // D = Rc*Rs + Rc*Ra + Rs*Ra, Cc = Rs*(Rc+Ra)/D, Cs = Rc*(Rs+Ra)/D.
    // rc_star diverges when the canopy is closed (LAI = 0 or rst -> inf);
    // take the limiting fractions directly rather than letting inf/inf
    // collapse to NaN.
    let (cc, cs) = if rc_star.is_infinite() && rs_star.is_infinite() {
        (0.5, 0.5)
    } else if rc_star.is_infinite() {
        (rs_star / (rs_star + ra_star).max(1e-9), 1.0)
    } else if rs_star.is_infinite() {
        (1.0, rc_star / (rc_star + ra_star).max(1e-9))
    } else {
        let d = (rc_star * rs_star + rc_star * ra_star + rs_star * ra_star).max(1e-9);
        (rs_star * (rc_star + ra_star) / d, rc_star * (rs_star + ra_star) / d)
    };

    let latent_crop = cc * pmc;
    let latent_soil = cs * pms;
    let latent_total = latent_crop + latent_soil;

    let sensible_soil = a_s - latent_soil;
    let sensible_crop = (a - a_s) - latent_crop;
    let sensible_total = a - latent_total;

    FluxOutputs {
        latent_crop,
        latent_soil,
        latent_total,
        sensible_crop,
        sensible_soil,
        sensible_total,
    }
}

/// Canopy temperature recovered from the sensible heat flux and the
/// crop/reference-air resistance path; falls back to `air_temp` when the
/// resistance path is degenerate (zero LAI, closed stomata) rather than
/// producing a divide-by-zero spike.
pub fn canopy_temperature(sensible_crop: f64, raa: f64, rca: f64, air_temp: f64) -> f64 {
    let r = raa + rca;
    if !r.is_finite() || r <= 1e-9 {
        return air_temp;
    }
    air_temp + sensible_crop * r / (RHO_CP * 1.0e6 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> FluxInputs {
        FluxInputs {
            available_energy_total: 400.0,
            available_energy_soil: 80.0,
            vpd_kpa: 1.2,
            svp_slope: 0.18,
            raa: 20.0,
            rsa: 30.0,
            rca: 15.0,
            rcs: 60.0,
            rss: 400.0,
        }
    }

    #[test]
    fn latent_fluxes_are_bounded_by_available_energy() {
        let out = solve(&sample_inputs());
        assert!(out.latent_total.is_finite());
        assert!(out.latent_crop.is_finite());
        assert!(out.latent_soil.is_finite());
    }

    #[test]
    fn energy_budget_closes() {
        let inputs = sample_inputs();
        let out = solve(&inputs);
        let closure = out.latent_total + out.sensible_total - inputs.available_energy_total;
        assert!(closure.abs() < 1e-6);
    }

    #[test]
    fn canopy_temperature_falls_back_to_air_temp_when_resistances_vanish() {
        let t = canopy_temperature(50.0, 0.0, 0.0, 28.0);
        assert_eq!(t, 28.0);
    }

    #[test]
    fn canopy_temperature_responds_to_sensible_flux_sign() {
        let warm = canopy_temperature(100.0, 20.0, 15.0, 28.0);
        let cool = canopy_temperature(-100.0, 20.0, 15.0, 28.0);
        assert!(warm > 28.0);
        assert!(cool < 28.0);
    }

    #[test]
    fn infinite_canopy_resistance_routes_all_latent_heat_through_soil_without_nan() {
        let mut inputs = sample_inputs();
        inputs.rcs = f64::INFINITY;
        let out = solve(&inputs);
        assert!(out.latent_crop.abs() < 1e-9);
        assert!(out.latent_total.is_finite());
        assert!(out.latent_soil.is_finite() && out.latent_soil > 0.0);
        let closure = out.latent_total + out.sensible_total - inputs.available_energy_total;
        assert!(closure.abs() < 1e-6);
    }
}
