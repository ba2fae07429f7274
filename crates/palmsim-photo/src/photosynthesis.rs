//! The photosynthesis component: composes canopy geometry, PAR
//! decomposition and leaf-level assimilation into whole-canopy, per-hour and
//! per-day operations.

use palmsim_core::{gauss_legendre, Result};

use crate::canopy;
use crate::co2;
use crate::leaf::{self, KineticConstants25C};
use crate::par::{self, ParTuple};

/// Configuration fixed for the life of a run.
#[derive(Debug, Clone)]
pub struct PhotosynthesisConfig {
    pub ambient_o2: f64,
    pub quantum_yield: f64,
    pub clump: f64,
    pub leaf_scatter: f64,
    pub ci_fraction: f64,
    pub optimum_temp_c: f64,
    pub sink_limit: f64,
    pub kinetics25: KineticConstants25C,
    pub planting_density_per_ha: f64,
}

impl Default for PhotosynthesisConfig {
    fn default() -> Self {
        PhotosynthesisConfig {
            ambient_o2: 210.0,
            quantum_yield: 0.05,
            clump: 1.0,
            leaf_scatter: 0.2,
            ci_fraction: 0.7,
            optimum_temp_c: 30.0,
            sink_limit: 25.0,
            kinetics25: KineticConstants25C::default(),
            planting_density_per_ha: 143.0,
        }
    }
}

/// Quantities fixed for the day: ambient CO2 (reset once per year) and LAI.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyPhoto {
    pub ambient_co2: f64,
    pub lai: f64,
    pub k_dr_ref: f64,
    pub k_df: f64,
    pub sunlit_lai: f64,
    pub shaded_lai: f64,
}

/// Instantaneous canopy state for one hour.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPhoto {
    pub par: ParTuple,
    pub canopy_assimilation: f64,
}

/// The photosynthesis component.
#[derive(Debug, Clone)]
pub struct Photosynthesis {
    pub config: PhotosynthesisConfig,
    pub daily: DailyPhoto,
    pub instant: InstantPhoto,
    current_year: f64,
}

impl Photosynthesis {
    pub fn new(config: PhotosynthesisConfig) -> Self {
        Photosynthesis {
            config,
            daily: DailyPhoto::default(),
            instant: InstantPhoto::default(),
            current_year: 0.0,
        }
    }

    /// React to a day-of-year change: recompute diffuse extinction and, if
    /// the year changed, re-sample ambient CO2 from the trend curve.
    pub fn set_day(&mut self, year: f64, lai: f64, midday_elevation_rad: f64) -> Result<()> {
        if (year - self.current_year).abs() > 1e-9 || self.daily.ambient_co2 == 0.0 {
            self.daily.ambient_co2 = co2::ambient_co2_for_year(year);
            self.current_year = year;
        }
        let k_dr_ref = canopy::k_dr(midday_elevation_rad);
        let k_df = canopy::k_df(self.config.clump)?;
        let (sunlit, shaded) = canopy::lai_split(k_dr_ref, lai);
        self.daily = DailyPhoto {
            ambient_co2: self.daily.ambient_co2,
            lai,
            k_dr_ref,
            k_df,
            sunlit_lai: sunlit,
            shaded_lai: shaded,
        };
        Ok(())
    }

    /// Solve canopy assimilation for one hour given solar elevation,
    /// incoming radiation and canopy temperature (supplied by the energy
    /// balance component).
    pub fn solve_hour(
        &mut self,
        solar_elevation_rad: f64,
        total_rad: f64,
        diffuse_fraction: f64,
        canopy_temp_c: f64,
    ) -> f64 {
        if solar_elevation_rad <= 0.0 || total_rad <= 0.0 {
            self.instant = InstantPhoto::default();
            return 0.0;
        }

        let k_dr = canopy::k_dr(solar_elevation_rad);
        let (pdr, pdf) = canopy::reflection_coefficients(self.config.leaf_scatter, solar_elevation_rad);
        let (direct, diffuse) = par::incoming_par(total_rad, diffuse_fraction);
        let par_tuple = par::decompose(
            direct,
            diffuse,
            k_dr,
            self.daily.k_df,
            pdr,
            pdf,
            self.config.leaf_scatter,
            self.daily.lai,
        );

        let kinetics = leaf::resolve_kinetics(&self.config.kinetics25, canopy_temp_c);
        let ci = leaf::internal_co2(
            self.daily.ambient_co2,
            self.config.ci_fraction,
            canopy_temp_c,
            self.config.optimum_temp_c,
        );
        let leaf_out = leaf::assimilation(
            &kinetics,
            ci,
            self.config.ambient_o2,
            self.config.quantum_yield,
            par_tuple.absorbed_sunlit,
            par_tuple.absorbed_shaded,
            self.config.sink_limit,
        );

        let canopy_assimilation =
            self.daily.sunlit_lai * leaf_out.sunlit + self.daily.shaded_lai * leaf_out.shaded;

        self.instant = InstantPhoto {
            par: par_tuple,
            canopy_assimilation,
        };
        canopy_assimilation
    }

    /// Integrate instantaneous canopy assimilation over daylight hours by
    /// 5-point Gauss-Legendre quadrature, converting to kg CH2O per palm per
    /// day using planting density and CH2O molar mass.
    pub fn daily_assimilation(
        &mut self,
        sunrise: f64,
        sunset: f64,
        mut hourly: impl FnMut(&mut Self, f64) -> f64,
    ) -> Result<f64> {
        let micromol_per_m2_per_hour =
            gauss_legendre(5, sunrise, sunset, |h| hourly(self, h))?;
        // micromol CO2/m2/s-equivalent integrated over hours -> mol/m2/day
        let mol_per_m2_day = micromol_per_m2_per_hour * 3600.0 / 1.0e6;
        let kg_ch2o_per_m2 = mol_per_m2_day * palmsim_core::CH2O_MOLAR_MASS_G / 1000.0;
        let m2_per_palm = 10_000.0 / self.config.planting_density_per_ha.max(1e-6);
        Ok(kg_ch2o_per_m2 * m2_per_palm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_day_splits_lai_correctly() {
        let mut photo = Photosynthesis::new(PhotosynthesisConfig::default());
        photo.set_day(2024.0, 5.0, 1.0).unwrap();
        assert!((photo.daily.sunlit_lai + photo.daily.shaded_lai - 5.0).abs() < 1e-9);
    }

    #[test]
    fn night_hour_yields_zero_assimilation() {
        let mut photo = Photosynthesis::new(PhotosynthesisConfig::default());
        photo.set_day(2024.0, 5.0, 1.0).unwrap();
        let a = photo.solve_hour(-0.1, 0.0, 0.3, 29.0);
        assert_eq!(a, 0.0);
    }

    #[test]
    fn midday_assimilation_is_positive() {
        let mut photo = Photosynthesis::new(PhotosynthesisConfig::default());
        photo.set_day(2024.0, 5.0, 1.3).unwrap();
        let a = photo.solve_hour(1.3, 800.0, 0.3, 29.0);
        assert!(a > 0.0);
    }

    #[test]
    fn daily_assimilation_is_positive_over_a_sunny_day() {
        let mut photo = Photosynthesis::new(PhotosynthesisConfig::default());
        photo.set_day(2024.0, 5.0, 1.3).unwrap();
        let result = photo
            .daily_assimilation(6.0, 18.0, |p, h| {
                let elevation = (std::f64::consts::PI * (h - 6.0) / 12.0).sin().max(0.0) * 1.3;
                p.solve_hour(elevation, 600.0 * elevation.max(0.0), 0.3, 29.0)
            })
            .unwrap();
        assert!(result > 0.0);
    }

    #[test]
    fn ambient_co2_resets_only_on_year_change() {
        let mut photo = Photosynthesis::new(PhotosynthesisConfig::default());
        photo.set_day(2024.0, 5.0, 1.0).unwrap();
        let first = photo.daily.ambient_co2;
        photo.daily.ambient_co2 = -1.0; // simulate in-year mutation
        photo.set_day(2024.0, 5.0, 1.0).unwrap();
        assert_eq!(photo.daily.ambient_co2, -1.0);
        photo.set_day(2025.0, 5.0, 1.0).unwrap();
        assert_ne!(photo.daily.ambient_co2, first);
    }

    #[test]
    fn doubling_ambient_co2_raises_assimilation_within_a_bounded_range() {
        let mut baseline = Photosynthesis::new(PhotosynthesisConfig::default());
        baseline.set_day(2024.0, 5.0, 1.3).unwrap();
        let a_baseline = baseline.solve_hour(1.3, 800.0, 0.3, 29.0);

        let mut doubled = Photosynthesis::new(PhotosynthesisConfig::default());
        doubled.set_day(2024.0, 5.0, 1.3).unwrap();
        doubled.daily.ambient_co2 *= 2.0;
        let a_doubled = doubled.solve_hour(1.3, 800.0, 0.3, 29.0);

        let ratio = a_doubled / a_baseline;
        assert!(ratio > 1.15 && ratio < 1.40, "ratio was {ratio}");
    }
}
