//! The driver: composes weather, meteorology, soil water, photosynthesis,
//! energy balance and crop into the per-day stepping order.
//!
//! Ordering within a day (the source's `doy_has_changed()` inheritance hook
//! and lazy-numeric-handle threading of canopy temperature are replaced here
//! by explicit parameter passing and a fixed sequential update order):
//!
//! 1. Meteorology advances the day; photosynthesis reacts explicitly by
//!    having its `set_day` called right after, rather than via a
//!    subscriber list.
//! 2. The root front advances and soil water advances one day using the
//!    previous day's PET split.
//! 3. Energy balance recomputes the day's fixed resistances.
//! 4. An explicit 24-hour loop solves energy and photosynthesis jointly for
//!    each hour, feeding canopy temperature from energy into photosynthesis
//!    and summing latent heat / assimilation as it goes. Each hour's row is
//!    also kept (see [`Driver::hourly_rows`]) for hourly-mode output.
//! 5. Crop consumes the day's assimilate and the soil-water stress factor.

use std::collections::HashMap;

use palmsim_core::{Doy, Error, Result, SolarHour};
use palmsim_crop::{Crop, PartKind};
use palmsim_energy::{DailyImmutables, EnergyBalance};
use palmsim_met::Meteorology;
use palmsim_photo::Photosynthesis;
use palmsim_soil::SoilWaterProfile;
use palmsim_weather::WeatherSource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::aux;
use crate::config::SimConfig;
use crate::output::{LayerOutput, OutputRow};

/// Latent heat of vaporisation of water (MJ/kg) at typical lowland tropical
/// temperatures, used to convert latent heat flux into an ET depth.
const LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG: f64 = 2.45;

/// The simulation driver: owns every component's state and the clock.
pub struct Driver {
    weather: Box<dyn WeatherSource>,
    meteorology: Meteorology,
    soil: SoilWaterProfile,
    photosynthesis: Photosynthesis,
    energy: EnergyBalance,
    crop: Crop,
    rng: StdRng,
    year: i64,
    doy: Doy,
    prev_pet_crop_mm: f64,
    prev_pet_soil_mm: f64,
    config: SimConfig,
    last_hourly_rows: Vec<OutputRow>,
}

impl Driver {
    pub fn new(config: SimConfig, weather: Box<dyn WeatherSource>) -> Result<Self> {
        let soil_layers = crate::config::build_soil_layers(&config.soil_layers);
        let soil = SoilWaterProfile::new(config.soil, soil_layers, config.initial_root_depth_m)?;

        let mut parts = HashMap::new();
        for (kind, spec) in config.crop_parts.clone() {
            parts.insert(kind, spec.into_part(kind));
        }
        for kind in [
            PartKind::Pinnae,
            PartKind::Rachis,
            PartKind::Trunk,
            PartKind::Roots,
            PartKind::MaleFlowers,
            PartKind::FemaleFlowers,
            PartKind::Bunches,
        ] {
            if !parts.contains_key(&kind) {
                return Err(Error::Input(format!("missing plant part configuration for {kind:?}")));
            }
        }
        let crop = Crop::new(config.crop.clone(), parts, config.sla_table.clone());

        let rng = if config.seed > 0 {
            StdRng::seed_from_u64(config.seed as u64)
        } else {
            StdRng::from_entropy()
        };

        Ok(Driver {
            weather,
            meteorology: Meteorology::new(config.meteorology.clone()),
            soil,
            photosynthesis: Photosynthesis::new(config.photosynthesis.clone()),
            energy: EnergyBalance::new(config.energy.clone()),
            crop,
            rng,
            year: 1,
            doy: Doy::default(),
            prev_pet_crop_mm: 0.0,
            prev_pet_soil_mm: 0.0,
            config,
            last_hourly_rows: Vec::new(),
        })
    }

    pub fn crop(&self) -> &Crop {
        &self.crop
    }

    pub fn soil(&self) -> &SoilWaterProfile {
        &self.soil
    }

    /// The 24 per-hour rows produced by the most recent [`Self::step_day`]
    /// call, in hour order. Empty until the first day has been stepped.
    pub fn hourly_rows(&self) -> &[OutputRow] {
        &self.last_hourly_rows
    }

    /// Advance the simulation by exactly one day and return its output row.
    pub fn step_day(&mut self) -> Result<OutputRow> {
        let doy_of_this_step = self.doy;

        // 1. Meteorology advances the day.
        let weather = self.weather.next_day()?;
        self.meteorology.set_day(doy_of_this_step, &weather)?;

        // doy_has_changed dependent: photosynthesis recomputes annual CO2
        // and the day's canopy geometry explicitly, right after meteorology,
        // rather than via a generic observer hook.
        let midday_elevation = {
            let d = &self.meteorology.daily;
            let (_, hgt, _) =
                palmsim_met::astronomy::sun_position(self.meteorology.config.lat_deg, d.declination, 12.0);
            hgt
        };
        self.photosynthesis
            .set_day(self.year as f64, self.crop.lai(), midday_elevation.max(0.05))?;

        // 2. Root front grows, then soil water advances using the previous
        // day's PET split (today's ET is only known after today's hourly loop).
        self.soil.advance_root_depth();
        let net_rain = self.soil.net_rainfall(self.meteorology.daily.rain, self.crop.lai());
        self.soil
            .advance_day(net_rain, self.prev_pet_crop_mm, self.prev_pet_soil_mm);

        // 3. Energy balance recomputes the day's fixed resistances.
        let reduction = self.soil.et_reduction();
        let daily_immutables = DailyImmutables {
            tree_height_m: self.crop.tree_height_m.max(1.0),
            lai: self.crop.lai(),
            vwc_surface: self.soil.layers[0].vwc,
            surface_sat: self.soil.layers[0].swc.sat,
            vwc_root: self.soil.root_zone.current,
            pwp: self.soil.root_zone.pwp,
            critical_vwc: self.soil.root_zone.critical,
        };
        self.energy
            .set_daily_immutables(daily_immutables, self.meteorology.daily.wind_mean)?;

        // 4. Explicit hourly loop: energy and photosynthesis solved jointly,
        // canopy temperature threaded from the former into the latter.
        let mut latent_total_sum = 0.0;
        let mut latent_crop_sum = 0.0;
        let mut latent_soil_sum = 0.0;
        let mut assim_sum_micromol_m2 = 0.0;
        self.last_hourly_rows.clear();

        let m2_per_palm = 10_000.0 / self.config.photosynthesis.planting_density_per_ha.max(1e-6);
        let wh_to_mj = 3600.0 / 1.0e6;

        for hour in 0..24 {
            self.meteorology.set_hour(SolarHour::new(hour as f64))?;
            let instant = self.meteorology.instant.clone();

            let soil_heat_flux = 0.1 * instant.net_rad;
            let energy_out = self.energy.solve_hour(
                instant.net_rad,
                soil_heat_flux,
                instant.vpd,
                palmsim_met::diurnal::svp_slope_kpa_per_c(instant.air_temp),
                instant.total_rad,
                instant.air_temp,
            );

            let canopy_temp = if self.crop.lai() <= 1e-9 { instant.air_temp } else { energy_out.canopy_temp };
            let assim = self.photosynthesis.solve_hour(
                instant.hgt,
                instant.total_rad,
                self.meteorology.daily.diffuse_fraction,
                canopy_temp,
            );

            let hour_et_crop_mm = energy_out.latent_crop * wh_to_mj / LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG;
            let hour_et_soil_mm = energy_out.latent_soil * wh_to_mj / LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG;
            let hour_et_total_mm = energy_out.latent_total * wh_to_mj / LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG;
            let hour_assim_kg =
                (assim * 3600.0 / 1.0e6 * palmsim_core::CH2O_MOLAR_MASS_G / 1000.0 * m2_per_palm).max(0.0);

            self.last_hourly_rows.push(OutputRow {
                doy: doy_of_this_step.value(),
                hour: Some(instant.hour),
                tmin: instant.air_temp,
                tmax: instant.air_temp,
                rain_mm: 0.0,
                wind: instant.wind,
                et_crop_mm: hour_et_crop_mm,
                et_soil_mm: hour_et_soil_mm,
                et_total_mm: hour_et_total_mm,
                canopy_assim_kg: hour_assim_kg,
                layers: Vec::new(),
                vdm_kg: self.crop.vdm_kg,
                tdm_kg: self.crop.tdm_kg,
                bunch_yield_kg: self.crop.bunch_yield_kg,
                tree_height_m: self.crop.tree_height_m,
                lai: self.crop.lai(),
            });

            latent_total_sum += energy_out.latent_total;
            latent_crop_sum += energy_out.latent_crop;
            latent_soil_sum += energy_out.latent_soil;
            assim_sum_micromol_m2 += assim;
        }

        // W/m^2 summed hourly -> MJ/m^2/day -> mm/day via latent heat of vaporisation.
        let et_total_mm = latent_total_sum * wh_to_mj / LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG;
        let et_crop_mm = latent_crop_sum * wh_to_mj / LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG;
        let et_soil_mm = latent_soil_sum * wh_to_mj / LATENT_HEAT_OF_VAPORIZATION_MJ_PER_KG;

        let mol_per_m2_day = assim_sum_micromol_m2 * 3600.0 / 1.0e6;
        let kg_ch2o_per_m2 = mol_per_m2_day * palmsim_core::CH2O_MOLAR_MASS_G / 1000.0;
        let canopy_assim_kg = (kg_ch2o_per_m2 * m2_per_palm).max(0.0);

        self.prev_pet_crop_mm = et_crop_mm.max(0.0);
        self.prev_pet_soil_mm = et_soil_mm.max(0.0);

        // 5. Crop consumes the day's assimilate and soil-water stress.
        self.crop.update(&mut self.rng, canopy_assim_kg, self.meteorology.daily.tmax, reduction.alpha_crop);

        let layers = self
            .soil
            .layers
            .iter()
            .map(|l| LayerOutput {
                vwc: l.vwc,
                influx: l.flux_influx,
                outflux: l.flux_outflux,
                netflux: l.flux_netflux,
            })
            .collect();

        let row = OutputRow {
            doy: doy_of_this_step.value(),
            hour: None,
            tmin: self.meteorology.daily.tmin,
            tmax: self.meteorology.daily.tmax,
            rain_mm: self.meteorology.daily.rain,
            wind: self.meteorology.daily.wind_mean,
            et_crop_mm,
            et_soil_mm,
            et_total_mm,
            canopy_assim_kg,
            layers,
            vdm_kg: self.crop.vdm_kg,
            tdm_kg: self.crop.tdm_kg,
            bunch_yield_kg: self.crop.bunch_yield_kg,
            tree_height_m: self.crop.tree_height_m,
            lai: self.crop.lai(),
        };

        // 6. Advance the clock for the next call.
        let (next_doy, wrapped) = self.doy.advance();
        self.doy = next_doy;
        if wrapped {
            self.year += 1;
        }

        Ok(row)
    }

    /// Resolve one auxiliary attribute path against the current state of
    /// every component that publishes a reflective view.
    pub fn resolve_aux(&self, path: &str) -> Option<f64> {
        let mut registry = HashMap::new();
        registry.extend(aux::AttributeSource::attributes(&self.crop));
        registry.extend(aux::AttributeSource::attributes(&self.soil));
        aux::resolve(&registry, path)
    }
}
