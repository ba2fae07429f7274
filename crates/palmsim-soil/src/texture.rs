//! Saxton-Rawls-style pedotransfer functions: derive soil-water
//! characteristics and Brooks-Corey parameters from texture fractions.

/// Soil texture as percentages of clay, sand and organic matter (0-100).
#[derive(Debug, Clone, Copy)]
pub struct Texture {
    pub clay_pct: f64,
    pub sand_pct: f64,
    pub om_pct: f64,
}

/// Derived soil-water characteristics and hydraulic parameters.
#[derive(Debug, Clone, Copy)]
pub struct SoilWaterCharacteristic {
    pub sat: f64,
    pub fc: f64,
    pub pwp: f64,
    pub psd: f64,
    pub porosity: f64,
    pub airentry: f64,
    pub ksat: f64,
}

/// Saxton & Rawls (2006) regression forms, in fractional (not percentage)
/// clay/sand/OM.
pub fn derive(texture: &Texture) -> SoilWaterCharacteristic {
    let clay = texture.clay_pct / 100.0;
    let sand = texture.sand_pct / 100.0;
    let om = texture.om_pct / 100.0;

    let pwp = (-0.024 * sand + 0.487 * clay + 0.006 * om
        + 0.005 * (sand * om)
        - 0.013 * (clay * om)
        + 0.068 * (sand * clay)
        + 0.031)
        .max(0.01);
    let pwp_adj = pwp + 0.14 * pwp - 0.02;

    let fc_raw = -0.251 * sand + 0.195 * clay + 0.011 * om
        + 0.006 * (sand * om)
        - 0.027 * (clay * om)
        + 0.452 * (sand * clay)
        + 0.299;
    let fc_adj = fc_raw + 1.283 * fc_raw.powi(2) - 0.374 * fc_raw - 0.015;
    let fc = fc_adj.max(pwp_adj + 0.02);

    let sat_slope = 0.278 * sand + 0.034 * clay + 0.022 * om
        - 0.018 * (sand * om)
        - 0.027 * (clay * om)
        - 0.584 * (sand * clay)
        + 0.078;
    let sat_adj = sat_slope + 0.636 * sat_slope - 0.107;
    let sat = (fc + sat_adj).clamp(fc + 0.02, 0.65);

    let porosity = sat;

    // Brooks-Corey pore-size distribution index and air-entry potential (kPa),
    // derived from the FC-SAT moisture-release slope.
    let psd = (((fc.ln() - sat.ln()) / (1500.0_f64.ln() - 33.0_f64.ln())).abs()).clamp(0.05, 0.7);
    let airentry = (33.0 * (fc / sat).powf(1.0 / psd.max(1e-6))).clamp(0.5, 30.0);

    let ksat = 1930.0 * (sat - fc).powf(3.0 - psd);

    SoilWaterCharacteristic {
        sat,
        fc,
        pwp: pwp_adj.min(fc - 0.01),
        psd,
        porosity,
        airentry,
        ksat: ksat.max(0.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandy_soil_has_lower_water_holding_capacity_than_clay() {
        let sand = Texture { clay_pct: 5.0, sand_pct: 85.0, om_pct: 2.0 };
        let clay = Texture { clay_pct: 60.0, sand_pct: 10.0, om_pct: 2.0 };
        let sand_swc = derive(&sand);
        let clay_swc = derive(&clay);
        assert!(sand_swc.fc < clay_swc.fc);
    }

    #[test]
    fn pwp_below_fc_below_sat() {
        let t = Texture { clay_pct: 30.0, sand_pct: 30.0, om_pct: 3.0 };
        let swc = derive(&t);
        assert!(swc.pwp < swc.fc);
        assert!(swc.fc < swc.sat);
    }

    #[test]
    fn ksat_is_positive() {
        let t = Texture { clay_pct: 20.0, sand_pct: 50.0, om_pct: 2.0 };
        assert!(derive(&t).ksat > 0.0);
    }
}
