//! Leaf-level assimilation: Arrhenius-style temperature corrections for the
//! Farquhar kinetic constants, and the three-way limitation (Rubisco-,
//! light-, sink-limited) per leaf class.

/// Temperature-dependent Farquhar kinetic constants at 25°C reference.
#[derive(Debug, Clone, Copy)]
pub struct KineticConstants25C {
    pub kc25: f64,
    pub ko25: f64,
    pub vcmax25: f64,
    pub gamma_star25: f64,
    pub specificity25: f64,
}

impl Default for KineticConstants25C {
    fn default() -> Self {
        KineticConstants25C {
            kc25: 404.9,
            ko25: 278.4,
            vcmax25: 60.0,
            gamma_star25: 42.75,
            specificity25: 2600.0,
        }
    }
}

/// Resolved kinetic constants at canopy temperature.
#[derive(Debug, Clone, Copy, Default)]
pub struct KineticConstants {
    pub kc: f64,
    pub ko: f64,
    pub vcmax: f64,
    pub gamma_star: f64,
    pub specificity: f64,
}

const GAS_CONSTANT: f64 = 8.314e-3; // kJ/mol/K

/// Arrhenius scaling of a rate constant from 25°C to `temp_c`, given its
/// activation energy (kJ/mol).
fn arrhenius(rate25: f64, activation_energy_kj: f64, temp_c: f64) -> f64 {
    let t_k = temp_c + 273.15;
    let t25_k = 298.15;
    rate25 * ((activation_energy_kj / GAS_CONSTANT) * (1.0 / t25_k - 1.0 / t_k)).exp()
}

/// Resolve all kinetic constants at canopy temperature.
pub fn resolve_kinetics(base: &KineticConstants25C, canopy_temp_c: f64) -> KineticConstants {
    KineticConstants {
        kc: arrhenius(base.kc25, 59.4, canopy_temp_c),
        ko: arrhenius(base.ko25, 36.0, canopy_temp_c),
        vcmax: arrhenius(base.vcmax25, 65.3, canopy_temp_c),
        gamma_star: arrhenius(base.gamma_star25, 37.8, canopy_temp_c),
        specificity: arrhenius(base.specificity25, -29.0, canopy_temp_c),
    }
}

/// Internal CO2 as a fixed fraction of ambient, with a small temperature
/// correction (stomata close further as canopy warms beyond an optimum).
pub fn internal_co2(ambient_co2: f64, ci_fraction: f64, canopy_temp_c: f64, optimum_temp_c: f64) -> f64 {
    let temp_correction = (1.0 - 0.01 * (canopy_temp_c - optimum_temp_c).max(0.0)).clamp(0.5, 1.0);
    ambient_co2 * ci_fraction * temp_correction
}

/// Leaf assimilation tuple: Rubisco-limited, light-limited (sunlit and
/// shaded separately), sink-limited, and the two resolved net rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafAssimilation {
    pub vc: f64,
    pub vqsl: f64,
    pub vqsh: f64,
    pub vs: f64,
    pub sunlit: f64,
    pub shaded: f64,
}

/// Solve leaf-level net assimilation for sunlit and shaded leaf classes.
pub fn assimilation(
    kinetics: &KineticConstants,
    ci: f64,
    ambient_o2: f64,
    quantum_yield: f64,
    absorbed_par_sunlit: f64,
    absorbed_par_shaded: f64,
    sink_limit: f64,
) -> LeafAssimilation {
    let vc = kinetics.vcmax * (ci - kinetics.gamma_star)
        / (ci + kinetics.kc * (1.0 + ambient_o2 / kinetics.ko)).max(1e-9);

    let light_limited = |absorbed_par: f64| -> f64 {
        quantum_yield * absorbed_par * (ci - kinetics.gamma_star) / (ci + 2.0 * kinetics.gamma_star).max(1e-9)
    };
    let vqsl = light_limited(absorbed_par_sunlit);
    let vqsh = light_limited(absorbed_par_shaded);
    let vs = sink_limit;

    LeafAssimilation {
        vc,
        vqsl,
        vqsh,
        vs,
        sunlit: vc.min(vqsl).min(vs).max(0.0),
        shaded: vc.min(vqsh).min(vs).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrhenius_increases_rate_with_temperature_for_positive_activation_energy() {
        let low = arrhenius(60.0, 65.3, 20.0);
        let high = arrhenius(60.0, 65.3, 30.0);
        assert!(high > low);
    }

    #[test]
    fn resolve_kinetics_matches_base_at_25c() {
        let base = KineticConstants25C::default();
        let k = resolve_kinetics(&base, 25.0);
        assert!((k.vcmax - base.vcmax25).abs() < 1e-6);
    }

    #[test]
    fn assimilation_is_nonnegative_and_light_limited_in_shade() {
        let base = KineticConstants25C::default();
        let k = resolve_kinetics(&base, 29.0);
        let out = assimilation(&k, 280.0, 210.0, 0.05, 400.0, 50.0, 20.0);
        assert!(out.sunlit >= 0.0);
        assert!(out.shaded >= 0.0);
        assert!(out.shaded <= out.sunlit);
    }

    #[test]
    fn internal_co2_scales_with_ambient() {
        let low = internal_co2(350.0, 0.7, 29.0, 30.0);
        let high = internal_co2(450.0, 0.7, 29.0, 30.0);
        assert!(high > low);
    }
}
