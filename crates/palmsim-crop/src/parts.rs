//! The seven plant "parts" and their per-part state: N/mineral content
//! lookups, maintenance demand, partition fraction, growth/death rates and
//! dry-matter weight.

use palmsim_core::Table;

/// Identifies one of the seven plant parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Pinnae,
    Rachis,
    Trunk,
    Roots,
    MaleFlowers,
    FemaleFlowers,
    Bunches,
}

impl PartKind {
    pub const VEGETATIVE: [PartKind; 4] =
        [PartKind::Pinnae, PartKind::Rachis, PartKind::Trunk, PartKind::Roots];
}

/// Per-part state and the age-indexed lookups that drive it.
#[derive(Debug, Clone)]
pub struct PlantPart {
    pub kind: PartKind,
    pub weight_kg: f64,
    pub n_content_table: Table,
    pub mineral_content_table: Table,
    pub partition_table: Table,
    pub death_rate_table: Table,
    pub q10: f64,
    pub maint_coeff_ref: f64,
    pub conversion_efficiency: f64,
    pub maintenance_demand: f64,
    pub partition_fraction: f64,
    pub growth_rate: f64,
    pub death_rate: f64,
}

impl PlantPart {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: PartKind,
        initial_weight_kg: f64,
        n_content_table: Table,
        mineral_content_table: Table,
        partition_table: Table,
        death_rate_table: Table,
        q10: f64,
        maint_coeff_ref: f64,
        conversion_efficiency: f64,
    ) -> Self {
        PlantPart {
            kind,
            weight_kg: initial_weight_kg,
            n_content_table,
            mineral_content_table,
            partition_table,
            death_rate_table,
            q10,
            maint_coeff_ref,
            conversion_efficiency,
            maintenance_demand: 0.0,
            partition_fraction: 0.0,
            growth_rate: 0.0,
            death_rate: 0.0,
        }
    }

    /// Age-indexed death rate, scaled up under water stress (stress = 1
    /// means no stress; lower values increase the death rate).
    pub fn death_rate_at(&self, age_days: f64, water_stress: f64) -> f64 {
        let base = self.death_rate_table.val(age_days);
        base * (2.0 - water_stress.clamp(0.0, 1.0))
    }

    /// Maintenance respiration: weight times a Q10-temperature-adjusted
    /// specific maintenance coefficient times the age-indexed N-content.
    pub fn maintenance_respiration(&mut self, age_days: f64, mean_temp_c: f64, ref_temp_c: f64) -> f64 {
        let n_content = self.n_content_table.val(age_days);
        let temp_adjustment = self.q10.powf((mean_temp_c - ref_temp_c) / 10.0);
        let maintenance = self.weight_kg * self.maint_coeff_ref * temp_adjustment * n_content;
        self.maintenance_demand = maintenance;
        maintenance
    }

    pub fn apply_growth_and_death(&mut self, growth_kg: f64, death_kg: f64) {
        self.growth_rate = growth_kg;
        self.death_rate = death_kg;
        self.weight_kg = (self.weight_kg + growth_kg - death_kg).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palmsim_core::parse_table_literal;

    fn sample_part(kind: PartKind) -> PlantPart {
        let n_table = parse_table_literal("0:0.02;3650:0.015").unwrap();
        let mineral_table = parse_table_literal("0:0.01;3650:0.01").unwrap();
        let partition_table = parse_table_literal("0:0.25;3650:0.25").unwrap();
        let death_table = parse_table_literal("0:0.001;3650:0.002").unwrap();
        PlantPart::new(kind, 10.0, n_table, mineral_table, partition_table, death_table, 2.0, 0.01, 0.65)
    }

    #[test]
    fn maintenance_respiration_scales_with_weight() {
        let mut light = sample_part(PartKind::Trunk);
        let mut heavy = sample_part(PartKind::Trunk);
        heavy.weight_kg = 100.0;
        let light_maint = light.maintenance_respiration(1000.0, 28.0, 25.0);
        let heavy_maint = heavy.maintenance_respiration(1000.0, 28.0, 25.0);
        assert!(heavy_maint > light_maint);
    }

    #[test]
    fn maintenance_respiration_increases_with_temperature_for_q10_above_one() {
        let mut part = sample_part(PartKind::Roots);
        let cool = part.maintenance_respiration(1000.0, 25.0, 25.0);
        let warm = part.maintenance_respiration(1000.0, 35.0, 25.0);
        assert!(warm > cool);
    }

    #[test]
    fn growth_and_death_update_weight_and_never_go_negative() {
        let mut part = sample_part(PartKind::Pinnae);
        part.apply_growth_and_death(0.0, 1000.0);
        assert_eq!(part.weight_kg, 0.0);
    }
}
