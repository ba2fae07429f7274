//! Flower/bunch cohort state and the stochastic sex-determination rule.

use rand::Rng;

/// A cohort's sex. The source conflates "aborted" and "male" under a single
/// zero-valued tag; pinned here as a distinct variant so downstream logic
/// (e.g. whether an aborted cohort still contributes to male-flower counts)
/// does not have to infer intent from a magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowerSex {
    Male,
    Female,
    Aborted,
}

/// One cohort occupying a boxcar cell.
#[derive(Debug, Clone, Copy)]
pub struct Cohort {
    pub age_days: u32,
    pub sex: FlowerSex,
    pub weight_kg: f64,
}

impl Cohort {
    pub fn new(sex: FlowerSex) -> Self {
        Cohort { age_days: 0, sex, weight_kg: 0.0 }
    }
}

/// Decide the sex of a newly initiated cohort. Under stress, the female
/// probability drops and stressed-out initiations become aborted rather
/// than outright female; an aborted cohort is tracked separately from a
/// deliberate male cohort even though both ultimately contribute no yield.
pub fn determine_sex(rng: &mut impl Rng, female_prob: f64, stress_factor: f64) -> FlowerSex {
    let effective_female_prob = (female_prob * stress_factor).clamp(0.0, 1.0);
    let roll: f64 = rng.gen_range(0.0..1.0);
    if roll < effective_female_prob {
        FlowerSex::Female
    } else if stress_factor < 0.5 {
        FlowerSex::Aborted
    } else {
        FlowerSex::Male
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn low_stress_never_aborts() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sex = determine_sex(&mut rng, 0.5, 1.0);
            assert_ne!(sex, FlowerSex::Aborted);
        }
    }

    #[test]
    fn high_stress_reduces_female_fraction() {
        let mut rng_low = StdRng::seed_from_u64(1);
        let mut rng_high = StdRng::seed_from_u64(1);
        let low_stress_females = (0..500).filter(|_| determine_sex(&mut rng_low, 0.6, 1.0) == FlowerSex::Female).count();
        let high_stress_females = (0..500).filter(|_| determine_sex(&mut rng_high, 0.6, 0.2) == FlowerSex::Female).count();
        assert!(high_stress_females < low_stress_females);
    }
}
