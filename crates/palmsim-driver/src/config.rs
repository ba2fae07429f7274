//! Aggregate configuration for a run: one sub-config per component plus the
//! initial conditions and run-mode switches that only the driver needs.

use std::collections::HashMap;

use palmsim_core::Table;
use palmsim_crop::{CropConfig, PartKind, PlantPart};
use palmsim_energy::EnergyBalanceConfig;
use palmsim_met::MeteorologyConfig;
use palmsim_photo::PhotosynthesisConfig;
use palmsim_soil::{SoilLayer, SoilProfileConfig, Texture};

/// Everything needed to construct a fresh [`crate::driver::Driver`].
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub seed: i64,
    pub meteorology: MeteorologyConfig,
    pub energy: EnergyBalanceConfig,
    pub photosynthesis: PhotosynthesisConfig,
    pub soil: SoilProfileConfig,
    pub soil_layers: Vec<SoilLayerSpec>,
    pub crop: CropConfig,
    pub crop_parts: HashMap<PartKind, PlantPartSpec>,
    pub sla_table: Table,
    pub initial_root_depth_m: f64,
    pub initial_tree_height_m: f64,
    /// Water content below which the critical-stress onset is triggered,
    /// expressed as a fraction between PWP and SAT (spec pins this at 0.6).
    pub critical_water_fraction: f64,
    /// Ceiling applied to effective LAI in the resistance network and in
    /// the canopy-geometry split (configurable rather than hardcoded).
    pub lai_ceiling: f64,
}

/// A single soil layer as read from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SoilLayerSpec {
    pub thickness_m: f64,
    pub texture: Texture,
    pub initial_vwc: f64,
}

/// A single plant part as read from configuration.
#[derive(Debug, Clone)]
pub struct PlantPartSpec {
    pub initial_weight_kg: f64,
    pub n_content_table: Table,
    pub mineral_content_table: Table,
    pub partition_table: Table,
    pub death_rate_table: Table,
    pub q10: f64,
    pub maint_coeff_ref: f64,
    pub conversion_efficiency: f64,
}

impl PlantPartSpec {
    pub fn into_part(self, kind: PartKind) -> PlantPart {
        PlantPart::new(
            kind,
            self.initial_weight_kg,
            self.n_content_table,
            self.mineral_content_table,
            self.partition_table,
            self.death_rate_table,
            self.q10,
            self.maint_coeff_ref,
            self.conversion_efficiency,
        )
    }
}

/// Build the layered soil profile's layers from their specs, threading
/// cumulative thickness top-to-bottom.
pub fn build_soil_layers(specs: &[SoilLayerSpec]) -> Vec<SoilLayer> {
    let mut acc = 0.0;
    specs
        .iter()
        .map(|spec| {
            acc += spec.thickness_m;
            SoilLayer::new(spec.thickness_m, spec.texture, spec.initial_vwc, acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_soil_layers_accumulates_thickness() {
        let specs = vec![
            SoilLayerSpec { thickness_m: 0.2, texture: Texture { clay_pct: 20.0, sand_pct: 40.0, om_pct: 2.0 }, initial_vwc: -2.0 },
            SoilLayerSpec { thickness_m: 0.3, texture: Texture { clay_pct: 20.0, sand_pct: 40.0, om_pct: 2.0 }, initial_vwc: -2.0 },
        ];
        let layers = build_soil_layers(&specs);
        assert!((layers[0].acc_thickness_m - 0.2).abs() < 1e-9);
        assert!((layers[1].acc_thickness_m - 0.5).abs() < 1e-9);
    }
}
