//! The energy balance component: composes the resistance network and the
//! Shuttleworth-Wallace flux solve into a per-hour and per-day stepping API.

use palmsim_core::{gauss_legendre, Result};

use crate::flux::{self, FluxInputs, FluxOutputs};
use crate::resistances;

/// Site/canopy configuration, fixed for the life of a run.
#[derive(Debug, Clone)]
pub struct EnergyBalanceConfig {
    pub ref_height_m: f64,
    pub k_d: f64,
    pub k_z: f64,
    pub eddy_ext_coeff: f64,
    pub leaf_width_m: f64,
    pub wind_ext_coeff: f64,
    pub rss_min: f64,
    pub rss_max: f64,
    pub rst_min: f64,
    pub vpd_threshold_kpa: f64,
    pub vpd_sensitivity: f64,
    pub half_sat_par: f64,
    pub lai_ceiling: f64,
    pub canopy_extinction: f64,
}

impl Default for EnergyBalanceConfig {
    fn default() -> Self {
        EnergyBalanceConfig {
            ref_height_m: 25.0,
            k_d: 0.75,
            k_z: 0.1,
            eddy_ext_coeff: 2.5,
            leaf_width_m: 0.1,
            wind_ext_coeff: 0.6,
            rss_min: 100.0,
            rss_max: 2000.0,
            rst_min: 100.0,
            vpd_threshold_kpa: 1.0,
            vpd_sensitivity: 0.3,
            half_sat_par: 200.0,
            lai_ceiling: 6.0,
            canopy_extinction: 0.55,
        }
    }
}

/// Quantities fixed for the day: tree height, LAI, water status.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyImmutables {
    pub tree_height_m: f64,
    pub lai: f64,
    pub vwc_surface: f64,
    pub surface_sat: f64,
    pub vwc_root: f64,
    pub pwp: f64,
    pub critical_vwc: f64,
}

/// Result of one hourly solve.
#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyBalance {
    pub available_energy_total: f64,
    pub available_energy_soil: f64,
    pub latent_crop: f64,
    pub latent_soil: f64,
    pub latent_total: f64,
    pub sensible_crop: f64,
    pub sensible_soil: f64,
    pub sensible_total: f64,
    pub canopy_temp: f64,
}

/// The energy balance component: owns the day's resistances and the latest
/// hourly solve.
#[derive(Debug, Clone)]
pub struct EnergyBalance {
    pub config: EnergyBalanceConfig,
    pub daily: DailyImmutables,
    resistances_today: ResistancesToday,
    pub hourly: HourlyBalance,
}

#[derive(Debug, Clone, Copy, Default)]
struct ResistancesToday {
    raa: f64,
    rsa: f64,
    rca: f64,
    rss: f64,
}

impl EnergyBalance {
    pub fn new(config: EnergyBalanceConfig) -> Self {
        EnergyBalance {
            config,
            daily: DailyImmutables::default(),
            resistances_today: ResistancesToday::default(),
            hourly: HourlyBalance::default(),
        }
    }

    /// Recompute everything that depends only on tree height, LAI and soil
    /// moisture, which are fixed within a day.
    pub fn set_daily_immutables(&mut self, daily: DailyImmutables, wind_mean: f64) -> Result<()> {
        self.daily = daily;
        let (d, z0) = resistances::wind_profile_params(daily.tree_height_m, self.config.k_d, self.config.k_z);
        let ustar = resistances::friction_velocity(wind_mean, self.config.ref_height_m, daily.tree_height_m, d, z0)?;
        let (raa, rsa) = resistances::raa_rsa(
            ustar,
            self.config.ref_height_m,
            daily.tree_height_m,
            d,
            z0,
            self.config.eddy_ext_coeff,
        );
        let wind_top = resistances::wind_at_canopy_top(ustar, daily.tree_height_m, d, z0);
        let rca = resistances::rca(wind_top, self.config.leaf_width_m, self.config.wind_ext_coeff);
        let rss = resistances::rss(daily.vwc_surface, daily.surface_sat, self.config.rss_min, self.config.rss_max);

        self.resistances_today = ResistancesToday { raa, rsa, rca, rss };
        Ok(())
    }

    /// Split net radiation between crop and soil by Beer's law attenuation
    /// through the canopy.
    pub fn split_available_energy(&self, net_radiation: f64, soil_heat_flux: f64) -> (f64, f64) {
        let transmitted =
            (-self.config.canopy_extinction * self.daily.lai.min(self.config.lai_ceiling)).exp();
        let a_total = net_radiation - soil_heat_flux;
        let a_soil = (net_radiation * transmitted - soil_heat_flux).max(0.0);
        (a_total, a_soil)
    }

    /// Solve fluxes for the current hour given net radiation, soil heat flux,
    /// VPD, slope of the SVP curve and absorbed PAR (for stomatal stress).
    pub fn solve_hour(
        &mut self,
        net_radiation: f64,
        soil_heat_flux: f64,
        vpd_kpa: f64,
        svp_slope: f64,
        absorbed_par: f64,
        air_temp: f64,
    ) -> HourlyBalance {
        let (a_total, a_soil) = self.split_available_energy(net_radiation, soil_heat_flux);

        let f_water =
            resistances::water_stress(self.daily.vwc_root, self.daily.pwp, self.daily.critical_vwc);
        let f_vpd = resistances::vpd_stress(vpd_kpa, self.config.vpd_threshold_kpa, self.config.vpd_sensitivity);
        let f_par = resistances::par_stress(absorbed_par, self.config.half_sat_par);
        let rst = resistances::rst(self.config.rst_min, f_water, f_vpd, f_par);
        let rcs = resistances::rcs(rst, self.daily.lai, self.config.lai_ceiling);

        let r = self.resistances_today;
        let inputs = FluxInputs {
            available_energy_total: a_total,
            available_energy_soil: a_soil,
            vpd_kpa,
            svp_slope,
            raa: r.raa,
            rsa: r.rsa,
            rca: r.rca,
            rcs,
            rss: r.rss,
        };
        let FluxOutputs {
            latent_crop,
            latent_soil,
            latent_total,
            sensible_crop,
            sensible_soil,
            sensible_total,
        } = flux::solve(&inputs);

        let canopy_temp = flux::canopy_temperature(sensible_crop, r.raa, r.rca, air_temp);

        self.hourly = HourlyBalance {
            available_energy_total: a_total,
            available_energy_soil: a_soil,
            latent_crop,
            latent_soil,
            latent_total,
            sensible_crop,
            sensible_soil,
            sensible_total,
            canopy_temp,
        };
        self.hourly
    }

    /// Integrate hourly latent heat flux over the daylight period using
    /// 5-point Gauss-Legendre quadrature, given a closure that evaluates the
    /// instantaneous flux for an hour of day.
    pub fn daily_latent_heat(
        &mut self,
        sunrise: f64,
        sunset: f64,
        mut hourly_flux: impl FnMut(&mut Self, f64) -> f64,
    ) -> Result<f64> {
        // integrate W/m^2 over hours, caller converts to MJ/m^2/day as needed.
        gauss_legendre(5, sunrise, sunset, |h| hourly_flux(self, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_daily() -> DailyImmutables {
        DailyImmutables {
            tree_height_m: 12.0,
            lai: 4.0,
            vwc_surface: 0.30,
            surface_sat: 0.40,
            vwc_root: 0.28,
            pwp: 0.10,
            critical_vwc: 0.25,
        }
    }

    #[test]
    fn set_daily_immutables_produces_positive_resistances() {
        let mut eb = EnergyBalance::new(EnergyBalanceConfig::default());
        eb.set_daily_immutables(sample_daily(), 2.0).unwrap();
        assert!(eb.resistances_today.raa > 0.0);
        assert!(eb.resistances_today.rsa >= 0.0);
        assert!(eb.resistances_today.rca > 0.0);
    }

    #[test]
    fn available_energy_split_leaves_soil_share_below_total() {
        let mut eb = EnergyBalance::new(EnergyBalanceConfig::default());
        eb.set_daily_immutables(sample_daily(), 2.0).unwrap();
        let (total, soil) = eb.split_available_energy(500.0, 20.0);
        assert!(soil < total);
        assert!(soil >= 0.0);
    }

    #[test]
    fn solve_hour_closes_energy_budget_against_net_radiation_and_soil_heat_flux() {
        let mut eb = EnergyBalance::new(EnergyBalanceConfig::default());
        eb.set_daily_immutables(sample_daily(), 2.0).unwrap();
        let net_radiation = 500.0;
        let soil_heat_flux = 20.0;
        let out = eb.solve_hour(net_radiation, soil_heat_flux, 1.2, 0.18, 400.0, 29.0);
        // net == et.total + h.total + g, checked against the real inputs
        // rather than the function's own available-energy output.
        let closure = out.latent_total + out.sensible_total + soil_heat_flux - net_radiation;
        assert!(closure.abs() < 1e-6);
    }

    #[test]
    fn zero_lai_routes_all_latent_heat_through_soil_path() {
        let mut eb = EnergyBalance::new(EnergyBalanceConfig::default());
        let mut daily = sample_daily();
        daily.lai = 0.0;
        eb.set_daily_immutables(daily, 2.0).unwrap();
        let out = eb.solve_hour(500.0, 20.0, 1.2, 0.18, 0.0, 29.0);
        assert!(out.latent_total.is_finite());
    }

    #[test]
    fn zero_lai_gives_zero_crop_available_energy() {
        let mut eb = EnergyBalance::new(EnergyBalanceConfig::default());
        let mut daily = sample_daily();
        daily.lai = 0.0;
        eb.set_daily_immutables(daily, 2.0).unwrap();
        let (a_total, a_soil) = eb.split_available_energy(500.0, 20.0);
        assert!((a_total - a_soil).abs() < 1e-9);
    }
}
