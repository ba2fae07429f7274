//! The soil-water profile: an ordered sequence of layers, root-zone
//! dynamics, inter-layer flux computation and daily explicit integration.

use palmsim_core::{Error, Result};

use crate::layer::SoilLayer;

/// Root-zone water-content aggregate, integrated over the rooted depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootZoneAggregate {
    pub current: f64,
    pub critical: f64,
    pub saturation: f64,
    pub fc: f64,
    pub pwp: f64,
}

/// Crop/soil stress reduction factors on potential ET.
#[derive(Debug, Clone, Copy, Default)]
pub struct EtReduction {
    pub alpha_crop: f64,
    pub alpha_soil: f64,
}

/// Configuration fixed for the life of a run.
#[derive(Debug, Clone, Copy)]
pub struct SoilProfileConfig {
    pub max_root_depth_m: f64,
    pub root_growth_rate_m_per_day: f64,
    pub has_watertable: bool,
    pub watertable_depth_m: f64,
    pub numintervals: u32,
    pub critical_fraction: f64,
    pub interception_coeff_per_lai: f64,
}

impl Default for SoilProfileConfig {
    fn default() -> Self {
        SoilProfileConfig {
            max_root_depth_m: 1.2,
            root_growth_rate_m_per_day: 0.002,
            has_watertable: false,
            watertable_depth_m: 2.0,
            numintervals: 24,
            critical_fraction: 0.6,
            interception_coeff_per_lai: 0.001,
        }
    }
}

/// The soil-water engine: owns every layer and the rooting state.
#[derive(Debug, Clone)]
pub struct SoilWaterProfile {
    pub config: SoilProfileConfig,
    pub layers: Vec<SoilLayer>,
    pub root_depth_m: f64,
    pub root_zone: RootZoneAggregate,
    /// Running total of water pushed out of the profile (positive, surface
    /// runoff when the top layer overflows `sat`) minus water drawn in to
    /// cover a deficit (negative, when a layer underflows `pwp`), across
    /// every [`Self::advance_day`] call. Needed to close the water-balance
    /// invariant since `clamp_vwc` does not conserve mass on its own.
    pub cumulative_overflow_m: f64,
}

impl SoilWaterProfile {
    pub fn new(config: SoilProfileConfig, layers: Vec<SoilLayer>, initial_root_depth_m: f64) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::Input("soil profile requires at least one layer".into()));
        }
        let bottom = layers.last().unwrap().acc_thickness_m;
        let root_depth_m = initial_root_depth_m.clamp(layers[0].thickness_m, bottom);
        let mut profile = SoilWaterProfile {
            config,
            layers,
            root_depth_m,
            root_zone: RootZoneAggregate::default(),
            cumulative_overflow_m: 0.0,
        };
        profile.update_root_zone_aggregate();
        Ok(profile)
    }

    fn profile_bottom_m(&self) -> f64 {
        self.layers.last().map(|l| l.acc_thickness_m).unwrap_or(0.0)
    }

    /// Net rainfall after canopy interception, clipped at zero.
    pub fn net_rainfall(&self, rainfall_mm: f64, lai: f64) -> f64 {
        (rainfall_mm - self.config.interception_coeff_per_lai * lai * rainfall_mm).max(0.0)
    }

    /// Grow the root front by the configured daily rate, bounded by the
    /// configured maximum and the profile bottom.
    pub fn advance_root_depth(&mut self) {
        let ceiling = self.config.max_root_depth_m.min(self.profile_bottom_m());
        self.root_depth_m = (self.root_depth_m + self.config.root_growth_rate_m_per_day).min(ceiling);
    }

    /// Recompute the root-zone aggregate by integrating layer water
    /// contents over the rooted depth, with a proportional contribution
    /// from the partially penetrated layer.
    pub fn update_root_zone_aggregate(&mut self) {
        let mut current = 0.0;
        let mut sat = 0.0;
        let mut fc = 0.0;
        let mut pwp = 0.0;
        let mut depth_covered = 0.0;

        for layer in &self.layers {
            if depth_covered >= self.root_depth_m {
                break;
            }
            let layer_top = layer.acc_thickness_m - layer.thickness_m;
            let penetration = (self.root_depth_m - layer_top).clamp(0.0, layer.thickness_m);
            if penetration <= 0.0 {
                continue;
            }
            let frac = penetration / layer.thickness_m;
            current += layer.vwc * frac * layer.thickness_m;
            sat += layer.swc.sat * frac * layer.thickness_m;
            fc += layer.swc.fc * frac * layer.thickness_m;
            pwp += layer.swc.pwp * frac * layer.thickness_m;
            depth_covered += penetration;
        }

        let root_depth = self.root_depth_m.max(1e-6);
        let current = current / root_depth;
        let sat = sat / root_depth;
        let fc = fc / root_depth;
        let pwp = pwp / root_depth;
        let critical = pwp + self.config.critical_fraction * (sat - pwp);

        self.root_zone = RootZoneAggregate { current, critical, saturation: sat, fc, pwp };
    }

    /// Crop and soil-evaporation stress reduction factors.
    pub fn et_reduction(&self) -> EtReduction {
        let rz = self.root_zone;
        let alpha_crop = ((rz.current - rz.pwp) / (rz.critical - rz.pwp).max(1e-6)).clamp(0.0, 1.0);
        let top = &self.layers[0];
        let alpha_soil =
            ((top.vwc - top.swc.pwp) / (top.swc.fc - top.swc.pwp).max(1e-6)).clamp(0.0, 1.0);
        EtReduction { alpha_crop, alpha_soil }
    }

    /// Harmonic mean of two conductivities, used at internal layer interfaces.
    fn harmonic_mean(a: f64, b: f64) -> f64 {
        if a <= 0.0 || b <= 0.0 {
            0.0
        } else {
            2.0 * a * b / (a + b)
        }
    }

    /// Advance the profile by one full day, using `numintervals` explicit
    /// sub-steps. `pet_crop`/`pet_soil` are the previous day's potential ET
    /// split (mm/day), converted internally to plant uptake and soil
    /// evaporation flux terms (m/day).
    pub fn advance_day(&mut self, net_rainfall_mm: f64, pet_crop_mm: f64, pet_soil_mm: f64) {
        for layer in &mut self.layers {
            layer.reset_daily_fluxes();
        }
        self.update_root_zone_aggregate();
        let reduction = self.et_reduction();
        let t_total_m_per_day = pet_crop_mm / 1000.0 * reduction.alpha_crop;
        let e_m_per_day = pet_soil_mm / 1000.0 * reduction.alpha_soil;
        let influx_top_m_per_day = net_rainfall_mm / 1000.0;

        let n = self.config.numintervals.max(1);
        let dt = 1.0 / n as f64;

        for step in 0..n {
            self.sub_step(dt, influx_top_m_per_day, t_total_m_per_day, e_m_per_day, step == 0);
        }

        for layer in &mut self.layers {
            self.cumulative_overflow_m += layer.clamp_vwc() * layer.thickness_m;
        }
        self.update_root_zone_aggregate();
    }

    fn sub_step(
        &mut self,
        dt: f64,
        influx_top_m_per_day: f64,
        t_total_m_per_day: f64,
        e_m_per_day: f64,
        first: bool,
    ) {
        for layer in &mut self.layers {
            layer.recompute_heads();
        }

        let n_layers = self.layers.len();
        let mut interface_flux = vec![0.0; n_layers.saturating_sub(1)];
        for i in 0..interface_flux.len() {
            let k_mean = Self::harmonic_mean(self.layers[i].conductivity, self.layers[i + 1].conductivity);
            let head_diff = self.layers[i].total_head_m() - self.layers[i + 1].total_head_m();
            let mean_thick = (self.layers[i].thickness_m + self.layers[i + 1].thickness_m) / 2.0;
            interface_flux[i] = k_mean * head_diff / mean_thick.max(1e-6);
        }

        let root_zone_water: f64 = self
            .layers
            .iter()
            .map(|l| {
                let layer_top = l.acc_thickness_m - l.thickness_m;
                let penetration = (self.root_depth_m - layer_top).clamp(0.0, l.thickness_m);
                l.vwc * penetration
            })
            .sum::<f64>()
            .max(1e-9);

        let bottom_outflux = if self.config.has_watertable {
            let bottom = self.layers.last().unwrap();
            let head_diff = self.config.watertable_depth_m - bottom.depth_m;
            -Self::harmonic_mean(bottom.conductivity, bottom.swc.ksat) * head_diff
                / bottom.thickness_m.max(1e-6)
        } else {
            self.layers.last().unwrap().conductivity
        };

        for i in 0..n_layers {
            let layer_top_depth = self.layers[i].acc_thickness_m - self.layers[i].thickness_m;
            let penetration =
                (self.root_depth_m - layer_top_depth).clamp(0.0, self.layers[i].thickness_m);
            let uptake_share = if root_zone_water > 0.0 {
                self.layers[i].vwc * penetration / root_zone_water
            } else {
                0.0
            };

            let influx = if i == 0 {
                influx_top_m_per_day
            } else {
                interface_flux[i - 1]
            };
            let outflux = if i + 1 < n_layers { interface_flux[i] } else { bottom_outflux };
            let t = t_total_m_per_day * uptake_share;
            let e = if i == 0 { e_m_per_day } else { 0.0 };
            let netflux = influx - outflux - t - e;

            let layer = &mut self.layers[i];
            if first {
                layer.flux_influx = influx * dt;
                layer.flux_outflux = outflux * dt;
                layer.flux_t = t * dt;
                layer.flux_e = e * dt;
                layer.flux_netflux = netflux * dt;
            } else {
                layer.flux_influx += influx * dt;
                layer.flux_outflux += outflux * dt;
                layer.flux_t += t * dt;
                layer.flux_e += e * dt;
                layer.flux_netflux += netflux * dt;
            }
            layer.vwc += netflux * dt / layer.thickness_m;
        }
    }
}
