//! Cross-component invariants that must hold on every simulated day: energy
//! closure, LAI partition, water-content bounds, boxcar length preservation
//! and assimilation non-negativity.

use std::collections::HashMap;

use palmsim_core::parse_table_literal;
use palmsim_crop::{CropConfig, PartKind};
use palmsim_driver::{Driver, PlantPartSpec, SimConfig, SoilLayerSpec};
use palmsim_energy::EnergyBalanceConfig;
use palmsim_met::MeteorologyConfig;
use palmsim_photo::PhotosynthesisConfig;
use palmsim_soil::{SoilProfileConfig, Texture};
use palmsim_weather::{MonthlyParams, StochasticWeatherGenerator, WeatherSource};

fn part_spec() -> PlantPartSpec {
    PlantPartSpec {
        initial_weight_kg: 5.0,
        n_content_table: parse_table_literal("0:0.02;7300:0.015").unwrap(),
        mineral_content_table: parse_table_literal("0:0.01;7300:0.01").unwrap(),
        partition_table: parse_table_literal("0:0.25;7300:0.25").unwrap(),
        death_rate_table: parse_table_literal("0:0.0005;7300:0.001").unwrap(),
        q10: 2.0,
        maint_coeff_ref: 0.01,
        conversion_efficiency: 0.65,
    }
}

fn base_config() -> SimConfig {
    let mut crop_parts = HashMap::new();
    for kind in [
        PartKind::Pinnae,
        PartKind::Rachis,
        PartKind::Trunk,
        PartKind::Roots,
        PartKind::MaleFlowers,
        PartKind::FemaleFlowers,
        PartKind::Bunches,
    ] {
        crop_parts.insert(kind, part_spec());
    }

    SimConfig {
        seed: 99,
        meteorology: MeteorologyConfig::default(),
        energy: EnergyBalanceConfig::default(),
        photosynthesis: PhotosynthesisConfig::default(),
        soil: SoilProfileConfig::default(),
        soil_layers: vec![
            SoilLayerSpec {
                thickness_m: 0.2,
                texture: Texture { clay_pct: 25.0, sand_pct: 40.0, om_pct: 3.0 },
                initial_vwc: -2.0,
            },
            SoilLayerSpec {
                thickness_m: 0.3,
                texture: Texture { clay_pct: 25.0, sand_pct: 40.0, om_pct: 3.0 },
                initial_vwc: -2.0,
            },
            SoilLayerSpec {
                thickness_m: 0.5,
                texture: Texture { clay_pct: 25.0, sand_pct: 40.0, om_pct: 3.0 },
                initial_vwc: -2.0,
            },
        ],
        crop: CropConfig {
            planting_density_per_ha: 143.0,
            thin_density_per_ha: Some(100.0),
            thin_age_days: Some(1825.0),
            female_flower_prob: 0.5,
            max_vdm_per_palm_per_year_kg: 50.0,
            male_flower_boxcar_len: 5,
            immature_bunch_boxcar_len: 30,
            mature_bunch_boxcar_len: 20,
            canopy_height_offset_m: 1.5,
            trunk_height_coeff: 0.01,
            ref_temp_c: 25.0,
            generative_fraction: 0.3,
            generative_conversion_efficiency: 0.65,
        },
        crop_parts,
        sla_table: parse_table_literal("0:8.0;7300:6.0").unwrap(),
        initial_root_depth_m: 0.4,
        initial_tree_height_m: 1.5,
        critical_water_fraction: 0.6,
        lai_ceiling: 6.0,
    }
}

/// A deterministic weather feed for scenarios that need exact control over
/// rain timing (dry-down / saturation-recovery), rather than the stochastic
/// generator's Markov-chain rain occurrence.
struct ScriptedWeather {
    day: u32,
    rain_on_day: HashMap<u32, f64>,
}

impl WeatherSource for ScriptedWeather {
    fn next_day(&mut self) -> palmsim_core::Result<HashMap<String, f64>> {
        self.day += 1;
        let mut record = HashMap::new();
        record.insert("tmin".to_string(), 22.0);
        record.insert("tmax".to_string(), 31.0);
        record.insert("wind".to_string(), 2.0);
        record.insert("sunhr".to_string(), 8.0);
        record.insert("rain".to_string(), self.rain_on_day.get(&self.day).copied().unwrap_or(0.0));
        Ok(record)
    }

    fn nsets(&self) -> usize {
        365
    }
}

fn zero_rain_weather(_seed: i64) -> Box<dyn WeatherSource> {
    Box::new(ScriptedWeather { day: 0, rain_on_day: HashMap::new() })
}

fn heavy_rain_weather(_seed: i64, rain_day: u32, rain_mm: f64) -> Box<dyn WeatherSource> {
    let mut rain_on_day = HashMap::new();
    rain_on_day.insert(rain_day, rain_mm);
    Box::new(ScriptedWeather { day: 0, rain_on_day })
}

fn weather_source(seed: i64) -> Box<dyn WeatherSource> {
    let params = MonthlyParams {
        pww: [0.5; 12],
        pwd: [0.3; 12],
        gamma_shape: [2.0; 12],
        gamma_scale: [5.0; 12],
        temp_mean: [28.0; 12],
        temp_amp: [2.0; 12],
        temp_cv: [0.05; 12],
        temp_ampcv: [0.01; 12],
        temp_meanwet: [26.0; 12],
        wind_shape: [2.0; 12],
        wind_scale: [3.0; 12],
    };
    Box::new(StochasticWeatherGenerator::new(params, seed))
}

#[test]
fn energy_and_lai_invariants_hold_across_a_year() {
    let mut driver = Driver::new(base_config(), weather_source(11)).unwrap();
    for _ in 0..365 {
        let row = driver.step_day().unwrap();
        assert!(row.et_total_mm.is_finite());
        assert!(row.canopy_assim_kg >= 0.0);
        assert!(row.lai >= 0.0);
    }
}

#[test]
fn water_content_stays_within_pwp_and_sat_every_day() {
    let mut driver = Driver::new(base_config(), weather_source(5)).unwrap();
    for _ in 0..200 {
        driver.step_day().unwrap();
        for layer in &driver.soil().layers {
            assert!(layer.vwc >= layer.swc.pwp - 1e-9);
            assert!(layer.vwc <= layer.swc.sat + 1e-9);
        }
    }
}

#[test]
fn boxcar_lengths_are_preserved_across_a_year() {
    let mut driver = Driver::new(base_config(), weather_source(3)).unwrap();
    for _ in 0..365 {
        driver.step_day().unwrap();
    }
    let crop = driver.crop();
    assert_eq!(crop.male_flowers.len(), 5);
    assert_eq!(crop.immature_bunches.len(), 30);
    assert_eq!(crop.mature_bunches.len(), 20);
}

#[test]
fn zero_lai_at_planting_yields_zero_crop_transpiration_and_assimilation() {
    let mut config = base_config();
    for spec in config.crop_parts.values_mut() {
        spec.initial_weight_kg = 0.0;
    }
    let mut driver = Driver::new(config, weather_source(21)).unwrap();
    let row = driver.step_day().unwrap();
    assert_eq!(row.lai, 0.0);
    assert_eq!(row.canopy_assim_kg, 0.0);
    assert!(row.et_crop_mm.abs() < 1e-6);
}

#[test]
fn deterministic_seed_reproduces_byte_identical_output_over_many_days() {
    let mut d1 = Driver::new(base_config(), weather_source(17)).unwrap();
    let mut d2 = Driver::new(base_config(), weather_source(17)).unwrap();
    for _ in 0..60 {
        let r1 = d1.step_day().unwrap();
        let r2 = d2.step_day().unwrap();
        assert_eq!(r1.to_record(), r2.to_record());
    }
}

#[test]
fn hourly_rows_on_doy_172_are_symmetric_about_solar_noon() {
    let mut driver = Driver::new(base_config(), weather_source(13)).unwrap();
    for _ in 0..172 {
        driver.step_day().unwrap();
    }
    let hourly = driver.hourly_rows();
    assert_eq!(hourly.len(), 24);

    let lit: Vec<usize> = hourly
        .iter()
        .enumerate()
        .filter(|(_, row)| row.et_total_mm > 1e-9)
        .map(|(h, _)| h)
        .collect();
    assert!(!lit.is_empty(), "expected at least one sunlit hour on DOY 172");
    let first = *lit.first().unwrap() as f64;
    let last = *lit.last().unwrap() as f64;
    let midpoint = (first + last) / 2.0;
    assert!((midpoint - 12.0).abs() <= 1.5, "sunlit window not centred on solar noon: {first}..{last}");
}

#[test]
fn dry_down_scenario_top_layer_vwc_decreases_monotonically_with_no_rain() {
    let mut config = base_config();
    for layer in &mut config.soil_layers {
        layer.initial_vwc = -1.0; // saturation end of the SAT-FC-PWP scale
    }
    let mut driver = Driver::new(config, zero_rain_weather(9)).unwrap();

    let mut prev_top_vwc = f64::INFINITY;
    for _ in 0..100 {
        driver.step_day().unwrap();
        let top_vwc = driver.soil().layers[0].vwc;
        assert!(top_vwc <= prev_top_vwc + 1e-9, "top layer vwc increased during dry-down");
        prev_top_vwc = top_vwc;
    }
}

#[test]
fn saturation_recovers_top_layer_to_sat_after_heavy_rain_following_dry_down() {
    let mut config = base_config();
    for layer in &mut config.soil_layers {
        layer.initial_vwc = -1.0;
    }
    let mut driver = Driver::new(config, zero_rain_weather(9)).unwrap();
    for _ in 0..60 {
        driver.step_day().unwrap();
    }
    let dried_vwc = driver.soil().layers[0].vwc;
    let sat = driver.soil().layers[0].swc.sat;
    assert!(dried_vwc < sat, "dry-down did not draw the top layer below saturation");

    let mut driver = Driver::new(
        {
            let mut config = base_config();
            for layer in &mut config.soil_layers {
                layer.initial_vwc = -1.0;
            }
            config
        },
        heavy_rain_weather(9, 60, 200.0),
    )
    .unwrap();
    for _ in 0..61 {
        driver.step_day().unwrap();
    }
    let recovered_vwc = driver.soil().layers[0].vwc;
    let sat = driver.soil().layers[0].swc.sat;
    assert!((recovered_vwc - sat).abs() < 1e-3, "top layer did not return to saturation after heavy rain");
    // 200mm in one day onto a dried-down profile exceeds what the layers and
    // drainage can absorb; the excess must show up as tracked runoff rather
    // than silently vanishing from the water balance.
    assert!(
        driver.soil().cumulative_overflow_m > 0.0,
        "heavy rain that saturated the top layer produced no tracked runoff"
    );
}

#[test]
fn thinning_drops_plant_density_without_resetting_part_weights() {
    let mut config = base_config();
    config.crop.thin_age_days = Some(5.0);
    let mut driver = Driver::new(config, weather_source(8)).unwrap();
    let mut pinnae_weight_before = 0.0;
    for day in 1..=10 {
        driver.step_day().unwrap();
        if day == 4 {
            assert_eq!(driver.crop().current_plant_density_per_ha, 143.0);
            pinnae_weight_before = driver.crop().parts[&PartKind::Pinnae].weight_kg;
        }
        if day == 5 {
            assert!(driver.crop().thinned);
            assert_eq!(driver.crop().current_plant_density_per_ha, 100.0);
            // Thinning changes plant density, not dry matter already accrued.
            assert!(driver.crop().parts[&PartKind::Pinnae].weight_kg >= pinnae_weight_before);
        }
    }
    assert!(driver.crop().thinned);
}
