//! The crop component: maintenance respiration, vegetative partition and
//! growth, flower/bunch cohort cycling, thinning and yield.

use std::collections::HashMap;

use palmsim_core::Table;
use rand::Rng;

use crate::boxcar::Boxcar;
use crate::flower::{self, Cohort, FlowerSex};
use crate::parts::{PartKind, PlantPart};

/// Static per-run configuration.
#[derive(Debug, Clone)]
pub struct CropConfig {
    pub planting_density_per_ha: f64,
    pub thin_density_per_ha: Option<f64>,
    pub thin_age_days: Option<f64>,
    pub female_flower_prob: f64,
    pub max_vdm_per_palm_per_year_kg: f64,
    pub male_flower_boxcar_len: usize,
    pub immature_bunch_boxcar_len: usize,
    pub mature_bunch_boxcar_len: usize,
    pub canopy_height_offset_m: f64,
    pub trunk_height_coeff: f64,
    pub ref_temp_c: f64,
    /// Share of post-maintenance assimilate routed to generative (flower
    /// and bunch) growth rather than vegetative growth.
    pub generative_fraction: f64,
    pub generative_conversion_efficiency: f64,
}

/// Per-day assimilate accounting.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssimilateSplit {
    pub maintenance: f64,
    pub growth: f64,
    pub generative: f64,
}

/// The crop state: tree age, parts, cohorts, derived totals.
#[derive(Debug, Clone)]
pub struct Crop {
    pub config: CropConfig,
    pub tree_age_days: f64,
    pub current_plant_density_per_ha: f64,
    pub thinned: bool,
    pub parts: HashMap<PartKind, PlantPart>,
    pub sla_table: Table,
    pub trunk_height_m: f64,
    pub tree_height_m: f64,
    pub vdm_kg: f64,
    pub tdm_kg: f64,
    pub vdm_demand_kg: f64,
    pub assimilates: AssimilateSplit,
    pub male_flowers: Boxcar<Cohort>,
    pub immature_bunches: Boxcar<Cohort>,
    pub mature_bunches: Boxcar<Cohort>,
    pub bunch_yield_kg: f64,
}

impl Crop {
    pub fn new(
        config: CropConfig,
        parts: HashMap<PartKind, PlantPart>,
        sla_table: Table,
    ) -> Self {
        let male_flowers = Boxcar::new(config.male_flower_boxcar_len);
        let immature_bunches = Boxcar::new(config.immature_bunch_boxcar_len);
        let mature_bunches = Boxcar::new(config.mature_bunch_boxcar_len);
        let density = config.planting_density_per_ha;
        Crop {
            config,
            tree_age_days: 0.0,
            current_plant_density_per_ha: density,
            thinned: false,
            parts,
            sla_table,
            trunk_height_m: 0.0,
            tree_height_m: 0.0,
            vdm_kg: 0.0,
            tdm_kg: 0.0,
            vdm_demand_kg: 0.0,
            assimilates: AssimilateSplit::default(),
            male_flowers,
            immature_bunches,
            mature_bunches,
            bunch_yield_kg: 0.0,
        }
    }

    fn part_mut(&mut self, kind: PartKind) -> &mut PlantPart {
        self.parts.get_mut(&kind).expect("all seven plant parts must be present")
    }

    fn part(&self, kind: PartKind) -> &PlantPart {
        self.parts.get(&kind).expect("all seven plant parts must be present")
    }

    /// Advance the crop by one day given the day's canopy assimilation
    /// (kg CH2O/palm), mean air temperature and a water-stress factor in
    /// `[0, 1]` (1 = unstressed) supplied by the soil-water component.
    pub fn update(
        &mut self,
        rng: &mut impl Rng,
        daily_assimilate_ch2o_kg: f64,
        mean_temp_c: f64,
        water_stress: f64,
    ) {
        self.tree_age_days += 1.0;

        // 1-2: maintenance respiration and shortfall handling.
        let mut total_maintenance = 0.0;
        for kind in [
            PartKind::Pinnae,
            PartKind::Rachis,
            PartKind::Trunk,
            PartKind::Roots,
            PartKind::MaleFlowers,
            PartKind::FemaleFlowers,
            PartKind::Bunches,
        ] {
            total_maintenance +=
                self.part_mut(kind).maintenance_respiration(self.tree_age_days, mean_temp_c, self.config.ref_temp_c);
        }
        let assim4maint = total_maintenance;
        let shortfall = (assim4maint - daily_assimilate_ch2o_kg).max(0.0);
        let assim_after_maint = (daily_assimilate_ch2o_kg - assim4maint).max(0.0);

        // 3: VDM demand from annualised per-density maximum.
        self.vdm_demand_kg = self.config.max_vdm_per_palm_per_year_kg / 365.0;

        // 4: vegetative partition fractions, age-indexed and normalised.
        let mut raw_fractions = HashMap::new();
        let mut fraction_sum = 0.0;
        for kind in PartKind::VEGETATIVE {
            let f = self.part(kind).partition_table.val(self.tree_age_days).max(0.0);
            raw_fractions.insert(kind, f);
            fraction_sum += f;
        }
        let fraction_sum = fraction_sum.max(1e-9);
        for kind in PartKind::VEGETATIVE {
            let normalised = raw_fractions[&kind] / fraction_sum;
            self.part_mut(kind).partition_fraction = normalised;
        }

        // 5: cvf, weighted mean conversion efficiency.
        let cvf: f64 = PartKind::VEGETATIVE
            .iter()
            .map(|k| self.part(*k).partition_fraction * self.part(*k).conversion_efficiency)
            .sum();

        // 6: growth and death rates per vegetative part.
        let available_for_growth = (assim_after_maint - shortfall.min(assim_after_maint)).max(0.0);
        let assim4generative = available_for_growth * self.config.generative_fraction;
        let assim4vegetative = available_for_growth - assim4generative;
        let mut vdm_total = 0.0;
        for kind in PartKind::VEGETATIVE {
            let fraction = self.part(kind).partition_fraction;
            let growth = fraction * assim4vegetative * cvf;
            let death_rate = self.part(kind).death_rate_at(self.tree_age_days, water_stress);
            let death = self.part(kind).weight_kg * death_rate;
            self.part_mut(kind).apply_growth_and_death(growth, death);
            vdm_total += self.part(kind).weight_kg;
        }
        self.vdm_kg = vdm_total;

        self.assimilates = AssimilateSplit {
            maintenance: assim4maint.min(daily_assimilate_ch2o_kg),
            growth: assim4vegetative,
            generative: assim4generative,
        };

        // 7: flower/bunch cohort cycling.
        self.cycle_cohorts(rng, water_stress, assim4generative);

        // 8: update heights; tdm includes generative parts.
        self.trunk_height_m = self.config.trunk_height_coeff * self.part(PartKind::Trunk).weight_kg;
        self.tree_height_m = self.trunk_height_m + self.config.canopy_height_offset_m;
        self.tdm_kg = self.vdm_kg
            + self.part(PartKind::MaleFlowers).weight_kg
            + self.part(PartKind::FemaleFlowers).weight_kg
            + self.part(PartKind::Bunches).weight_kg;

        // 9: thinning.
        self.apply_thinning_if_due();
    }

    /// Leaf area index from pinnae dry weight and the age-indexed SLA
    /// lookup, scaled to a per-ground-area basis by current plant density.
    pub fn lai(&self) -> f64 {
        let sla = self.sla_table.val(self.tree_age_days);
        let pinnae_kg_per_palm = self.part(PartKind::Pinnae).weight_kg;
        pinnae_kg_per_palm * sla * self.current_plant_density_per_ha / 10_000.0
    }

    fn cycle_cohorts(&mut self, rng: &mut impl Rng, water_stress: f64, assim4generative_kg: f64) {
        let sex = flower::determine_sex(rng, self.config.female_flower_prob, water_stress);

        // Distribute today's generative assimilate evenly across every
        // occupied bunch cohort before anything advances or is harvested.
        let generative_dm = assim4generative_kg * self.config.generative_conversion_efficiency;
        let occupied = self.immature_bunches.occupied_count() + self.mature_bunches.occupied_count();
        if occupied > 0 {
            let per_cohort = generative_dm / occupied as f64;
            for cell in self.immature_bunches.iter_mut().chain(self.mature_bunches.iter_mut()) {
                if let Some(cohort) = cell {
                    cohort.weight_kg += per_cohort;
                }
            }
        }

        let new_head = Some(Cohort::new(sex));
        self.male_flowers.advance(new_head);

        let new_bunch_head = if sex == FlowerSex::Female { Some(Cohort::new(FlowerSex::Female)) } else { None };
        let evicted_immature = self.immature_bunches.advance(new_bunch_head);
        let evicted_mature = self.mature_bunches.advance(evicted_immature);
        if let Some(harvested) = evicted_mature {
            self.bunch_yield_kg += harvested.weight_kg;
        }

        let bunch_weight: f64 = self.immature_bunches.iter().chain(self.mature_bunches.iter())
            .filter_map(|c| c.as_ref())
            .map(|c| c.weight_kg)
            .sum();
        self.part_mut(PartKind::Bunches).weight_kg = bunch_weight;
    }

    fn apply_thinning_if_due(&mut self) {
        if self.thinned {
            return;
        }
        if let (Some(thin_density), Some(thin_age)) =
            (self.config.thin_density_per_ha, self.config.thin_age_days)
        {
            if self.tree_age_days >= thin_age {
                self.current_plant_density_per_ha = thin_density;
                self.thinned = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palmsim_core::parse_table_literal;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_part(kind: PartKind, weight: f64) -> PlantPart {
        let n_table = parse_table_literal("0:0.02;7300:0.015").unwrap();
        let mineral_table = parse_table_literal("0:0.01;7300:0.01").unwrap();
        let partition_table = parse_table_literal("0:0.25;7300:0.25").unwrap();
        let death_table = parse_table_literal("0:0.0005;7300:0.001").unwrap();
        PlantPart::new(kind, weight, n_table, mineral_table, partition_table, death_table, 2.0, 0.01, 0.65)
    }

    fn make_crop() -> Crop {
        let mut parts = HashMap::new();
        for kind in [
            PartKind::Pinnae,
            PartKind::Rachis,
            PartKind::Trunk,
            PartKind::Roots,
            PartKind::MaleFlowers,
            PartKind::FemaleFlowers,
            PartKind::Bunches,
        ] {
            parts.insert(kind, make_part(kind, 5.0));
        }
        let sla_table = parse_table_literal("0:8.0;7300:6.0").unwrap();
        let config = CropConfig {
            planting_density_per_ha: 143.0,
            thin_density_per_ha: Some(120.0),
            thin_age_days: Some(10.0),
            female_flower_prob: 0.5,
            max_vdm_per_palm_per_year_kg: 50.0,
            male_flower_boxcar_len: 5,
            immature_bunch_boxcar_len: 5,
            mature_bunch_boxcar_len: 3,
            canopy_height_offset_m: 1.5,
            trunk_height_coeff: 0.01,
            ref_temp_c: 25.0,
            generative_fraction: 0.3,
            generative_conversion_efficiency: 0.65,
        };
        Crop::new(config, parts, sla_table)
    }

    #[test]
    fn vegetative_partition_fractions_sum_to_one() {
        let mut crop = make_crop();
        let mut rng = StdRng::seed_from_u64(42);
        crop.update(&mut rng, 2.0, 28.0, 1.0);
        let sum: f64 = PartKind::VEGETATIVE.iter().map(|k| crop.part(*k).partition_fraction).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn thinning_triggers_once_age_threshold_crossed() {
        let mut crop = make_crop();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..15 {
            crop.update(&mut rng, 2.0, 28.0, 1.0);
        }
        assert!(crop.thinned);
        assert_eq!(crop.current_plant_density_per_ha, 120.0);
    }

    #[test]
    fn boxcar_lengths_stay_fixed_across_many_days() {
        let mut crop = make_crop();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            crop.update(&mut rng, 2.0, 28.0, 1.0);
        }
        assert_eq!(crop.male_flowers.len(), 5);
        assert_eq!(crop.immature_bunches.len(), 5);
        assert_eq!(crop.mature_bunches.len(), 3);
    }

    #[test]
    fn lai_grows_as_pinnae_weight_grows() {
        let mut crop = make_crop();
        let mut rng = StdRng::seed_from_u64(11);
        let lai_start = crop.lai();
        for _ in 0..20 {
            crop.update(&mut rng, 3.0, 28.0, 1.0);
        }
        assert!(crop.lai() > lai_start);
    }

    #[test]
    fn weights_never_go_negative_under_zero_assimilate() {
        let mut crop = make_crop();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..30 {
            crop.update(&mut rng, 0.0, 28.0, 0.1);
        }
        for kind in PartKind::VEGETATIVE {
            assert!(crop.part(kind).weight_kg >= 0.0);
        }
    }
}
