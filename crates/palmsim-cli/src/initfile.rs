//! Plain-text key=value initialization file reader.
//!
//! One `key=value` pair per line; blank lines and `#`-prefixed lines are
//! comments. Keys are flattened into a map and then consumed one-by-one
//! while building a [`SimConfig`]; any key left over once every recognised
//! key has been read is rejected as unknown.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use palmsim_core::{parse_table_literal, Error, Result, Table};
use palmsim_crop::{CropConfig, PartKind};
use palmsim_driver::{PlantPartSpec, SimConfig, SoilLayerSpec};
use palmsim_energy::EnergyBalanceConfig;
use palmsim_met::MeteorologyConfig;
use palmsim_photo::PhotosynthesisConfig;
use palmsim_soil::{SoilProfileConfig, Texture};

/// A flat `key -> value` record parsed from an initialization file.
pub struct InitFile {
    entries: HashMap<String, String>,
}

impl InitFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Input(format!("cannot read init file {}: {e}", path.display())))?;
        let mut entries = HashMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                Error::Input(format!("init file line {}: expected key=value, got '{line}'", lineno + 1))
            })?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(InitFile { entries })
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    fn take_f64(&mut self, key: &str, default: f64) -> Result<f64> {
        match self.take(key) {
            Some(v) => v.parse().map_err(|_| Error::Input(format!("key '{key}' is not a number: '{v}'"))),
            None => Ok(default),
        }
    }

    fn take_u32(&mut self, key: &str, default: u32) -> Result<u32> {
        match self.take(key) {
            Some(v) => v.parse().map_err(|_| Error::Input(format!("key '{key}' is not an integer: '{v}'"))),
            None => Ok(default),
        }
    }

    fn take_usize(&mut self, key: &str, default: usize) -> Result<usize> {
        match self.take(key) {
            Some(v) => v.parse().map_err(|_| Error::Input(format!("key '{key}' is not an integer: '{v}'"))),
            None => Ok(default),
        }
    }

    fn take_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        match self.take(key) {
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(Error::Input(format!("key '{key}' is not a boolean: '{other}'"))),
            },
            None => Ok(default),
        }
    }

    fn take_opt_f64(&mut self, key: &str) -> Result<Option<f64>> {
        match self.take(key) {
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| Error::Input(format!("key '{key}' is not a number: '{v}'"))),
            None => Ok(None),
        }
    }

    fn take_table(&mut self, key: &str, default: &str) -> Result<Table> {
        let raw = self.take(key).unwrap_or_else(|| default.to_string());
        parse_table_literal(&raw)
    }
}

const PART_NAMES: [(&str, PartKind); 7] = [
    ("pinnae", PartKind::Pinnae),
    ("rachis", PartKind::Rachis),
    ("trunk", PartKind::Trunk),
    ("roots", PartKind::Roots),
    ("maleflowers", PartKind::MaleFlowers),
    ("femaleflowers", PartKind::FemaleFlowers),
    ("bunches", PartKind::Bunches),
];

fn part_spec(init: &mut InitFile, name: &str) -> Result<PlantPartSpec> {
    Ok(PlantPartSpec {
        initial_weight_kg: init.take_f64(&format!("part.{name}.weight"), 1.0)?,
        n_content_table: init.take_table(&format!("part.{name}.n"), "0:0.02;7300:0.015")?,
        mineral_content_table: init.take_table(&format!("part.{name}.mineral"), "0:0.01;7300:0.01")?,
        partition_table: init.take_table(&format!("part.{name}.partition"), "0:0.25;7300:0.25")?,
        death_rate_table: init.take_table(&format!("part.{name}.death"), "0:0.0005;7300:0.001")?,
        q10: init.take_f64(&format!("part.{name}.q10"), 2.0)?,
        maint_coeff_ref: init.take_f64(&format!("part.{name}.maint"), 0.01)?,
        conversion_efficiency: init.take_f64(&format!("part.{name}.eff"), 0.65)?,
    })
}

/// Build a full [`SimConfig`] by consuming recognised keys out of `init`.
/// Any key still present afterwards is an unknown key and is rejected.
pub fn build_sim_config(mut init: InitFile) -> Result<SimConfig> {
    let lat_deg = init.take_f64("lat", 1.0)?;
    let station_height_m = init.take_f64("methgt", 2.0)?;
    let lag_hours = init.take_f64("lag_hours", 2.0)?;
    let angstrom_a = init.take_f64("angstrom_a", 0.25)?;
    let angstrom_b = init.take_f64("angstrom_b", 0.5)?;
    let albedo = init.take_f64("albedo", 0.23)?;
    let net_long_coeff = init.take_f64("net_long_coeff", 0.34)?;
    let meteorology = MeteorologyConfig {
        lat_deg,
        station_height_m,
        lag_hours,
        angstrom_a,
        angstrom_b,
        albedo,
        net_long_coeff,
    };

    let defaults = EnergyBalanceConfig::default();
    // `lai_ceiling` bounds effective LAI in both the resistance network and
    // the driver's canopy-geometry split; read it once and reuse the value.
    let lai_ceiling = init.take_f64("lai_ceiling", defaults.lai_ceiling)?;
    let energy = EnergyBalanceConfig {
        ref_height_m: init.take_f64("refhgt", defaults.ref_height_m)?,
        k_d: init.take_f64("k_d", defaults.k_d)?,
        k_z: init.take_f64("k_z", defaults.k_z)?,
        eddy_ext_coeff: init.take_f64("eddyext", defaults.eddy_ext_coeff)?,
        leaf_width_m: init.take_f64("leafdim.width", defaults.leaf_width_m)?,
        wind_ext_coeff: init.take_f64("windext", defaults.wind_ext_coeff)?,
        rss_min: init.take_f64("rss_min", defaults.rss_min)?,
        rss_max: init.take_f64("rss_max", defaults.rss_max)?,
        rst_min: init.take_f64("rst_min", defaults.rst_min)?,
        vpd_threshold_kpa: init.take_f64("vpd_threshold", defaults.vpd_threshold_kpa)?,
        vpd_sensitivity: init.take_f64("vpd_sensitivity", defaults.vpd_sensitivity)?,
        half_sat_par: init.take_f64("half_sat_par", defaults.half_sat_par)?,
        lai_ceiling,
        canopy_extinction: init.take_f64("canopy_extinction", defaults.canopy_extinction)?,
    };
    if energy.ref_height_m <= 0.0 {
        return Err(Error::Input("refhgt must be positive".into()));
    }
    // `leafdim.length` has no distinct counterpart in the resistance model
    // (a single characteristic leaf dimension is used); accept and validate
    // the key so a recognised init file isn't rejected for carrying it.
    let _leafdim_length = init.take_f64("leafdim.length", 0.5)?;

    // `plantdens` feeds both the photosynthesis ground-area scaling and the
    // crop's per-hectare density; read it once and reuse the value.
    let planting_density_per_ha = init.take_f64("plantdens", 143.0)?;

    let photo_defaults = PhotosynthesisConfig::default();
    let photosynthesis = PhotosynthesisConfig {
        quantum_yield: init.take_f64("quantum_yield", photo_defaults.quantum_yield)?,
        clump: init.take_f64("clump", photo_defaults.clump)?,
        ambient_o2: init.take_f64("ambient_o2", photo_defaults.ambient_o2)?,
        leaf_scatter: init.take_f64("leaf_scatter", photo_defaults.leaf_scatter)?,
        ci_fraction: init.take_f64("ci_fraction", photo_defaults.ci_fraction)?,
        optimum_temp_c: init.take_f64("optimum_temp", photo_defaults.optimum_temp_c)?,
        sink_limit: init.take_f64("sink_limit", photo_defaults.sink_limit)?,
        kinetics25: photo_defaults.kinetics25,
        planting_density_per_ha,
    };
    // `co2ambient` is driven by the simulated calendar year via a historical
    // trend curve rather than a static override; accept the key so a
    // recognised init file carrying it is not rejected.
    let _co2ambient = init.take_f64("co2ambient", 0.0)?;

    let soil_defaults = SoilProfileConfig::default();
    // `critical_water_fraction` gates both the soil profile's own stress
    // onset and the driver's top-level stress signal; read it once and
    // reuse the value.
    let critical_water_fraction = init.take_f64("critical_water_fraction", soil_defaults.critical_fraction)?;
    let soil = SoilProfileConfig {
        max_root_depth_m: init.take_f64("max_root_depth", soil_defaults.max_root_depth_m)?,
        root_growth_rate_m_per_day: init.take_f64("root_growth_rate", soil_defaults.root_growth_rate_m_per_day)?,
        has_watertable: init.take_bool("has_watertable", soil_defaults.has_watertable)?,
        watertable_depth_m: init.take_f64("watertable_depth", soil_defaults.watertable_depth_m)?,
        numintervals: init.take_u32("numintervals", soil_defaults.numintervals)?,
        critical_fraction: critical_water_fraction,
        interception_coeff_per_lai: init.take_f64("interception_coeff", soil_defaults.interception_coeff_per_lai)?,
    };

    let num_layers = init.take_usize("num_layers", 3)?;
    let mut soil_layers = Vec::with_capacity(num_layers);
    for i in 0..num_layers {
        soil_layers.push(SoilLayerSpec {
            thickness_m: init.take_f64(&format!("layer.{i}.thick"), 0.2)?,
            texture: Texture {
                clay_pct: init.take_f64(&format!("layer.{i}.clay"), 25.0)?,
                sand_pct: init.take_f64(&format!("layer.{i}.sand"), 40.0)?,
                om_pct: init.take_f64(&format!("layer.{i}.om"), 3.0)?,
            },
            initial_vwc: init.take_f64(&format!("layer.{i}.vwc"), -2.0)?,
        });
    }

    let crop = CropConfig {
        planting_density_per_ha,
        thin_density_per_ha: init.take_opt_f64("thinplantdens")?,
        thin_age_days: init.take_opt_f64("thinage")?,
        female_flower_prob: init.take_f64("female_prob", 0.5)?,
        max_vdm_per_palm_per_year_kg: init.take_f64("max_vdm_per_palm_per_year", 50.0)?,
        male_flower_boxcar_len: init.take_usize("male_flower_boxcar_len", 5)?,
        immature_bunch_boxcar_len: init.take_usize("immature_bunch_boxcar_len", 30)?,
        mature_bunch_boxcar_len: init.take_usize("mature_bunch_boxcar_len", 20)?,
        canopy_height_offset_m: init.take_f64("canopy_height_offset", 1.5)?,
        trunk_height_coeff: init.take_f64("trunk_height_coeff", 0.01)?,
        ref_temp_c: init.take_f64("ref_temp", 25.0)?,
        generative_fraction: init.take_f64("generative_fraction", 0.3)?,
        generative_conversion_efficiency: init.take_f64("generative_conversion_efficiency", 0.65)?,
    };

    let mut crop_parts = HashMap::new();
    for (name, kind) in PART_NAMES {
        crop_parts.insert(kind, part_spec(&mut init, name)?);
    }

    let sla_table = init.take_table("sla", "0:8.0;7300:6.0")?;
    let initial_root_depth_m = init.take_f64("rootdepth", 0.4)?;
    let initial_tree_height_m = init.take_f64("initial_tree_height", 1.5)?;
    let seed = init.take_opt_f64("seed")?.unwrap_or(0.0) as i64;

    if !init.entries.is_empty() {
        let mut unknown: Vec<&String> = init.entries.keys().collect();
        unknown.sort();
        return Err(Error::Input(format!(
            "unknown init file key(s): {}",
            unknown.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        )));
    }

    Ok(SimConfig {
        seed,
        meteorology,
        energy,
        photosynthesis,
        soil,
        soil_layers,
        crop,
        crop_parts,
        sla_table,
        initial_root_depth_m,
        initial_tree_height_m,
        critical_water_fraction,
        lai_ceiling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal_init_text() -> String {
        "lat=1.2\nseed=42\nnum_layers=1\n".to_string()
    }

    #[test]
    fn loads_minimal_init_file_with_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{}", minimal_init_text()).unwrap();
        let init = InitFile::load(f.path()).unwrap();
        let config = build_sim_config(init).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.soil_layers.len(), 1);
        assert!((config.meteorology.lat_deg - 1.2).abs() < 1e-9);
    }

    #[test]
    fn rejects_unknown_key() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "num_layers=1\nbogus_key=1\n").unwrap();
        let init = InitFile::load(f.path()).unwrap();
        let err = build_sim_config(init).unwrap_err();
        assert!(err.to_string().contains("bogus_key"));
    }

    #[test]
    fn rejects_malformed_line() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not_a_key_value_line\n").unwrap();
        assert!(InitFile::load(f.path()).is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "# a comment\n\nnum_layers=1\nlat=3.0\n").unwrap();
        let init = InitFile::load(f.path()).unwrap();
        let config = build_sim_config(init).unwrap();
        assert!((config.meteorology.lat_deg - 3.0).abs() < 1e-9);
    }
}
