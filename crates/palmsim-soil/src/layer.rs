//! A single soil layer: texture-derived characteristics, current water
//! content, matric/gravity head, conductivity and the five fluxes.

use crate::texture::{self, SoilWaterCharacteristic, Texture};

/// One layer of the soil-water profile. Layer 0 is at the surface.
#[derive(Debug, Clone, Copy)]
pub struct SoilLayer {
    pub thickness_m: f64,
    pub texture: Texture,
    pub swc: SoilWaterCharacteristic,
    pub vwc: f64,
    pub acc_thickness_m: f64,
    pub depth_m: f64,
    pub conductivity: f64,
    pub matric_head_m: f64,
    pub gravity_head_m: f64,
    pub flux_t: f64,
    pub flux_e: f64,
    pub flux_influx: f64,
    pub flux_outflux: f64,
    pub flux_netflux: f64,
}

impl SoilLayer {
    /// Construct a layer from texture and an initial water content.
    /// A negative `initial_vwc` encodes a position on the `[-3,-1]`
    /// SAT-FC-PWP scale (e.g. -1.0 = PWP, -2.0 = FC, -3.0 = SAT),
    /// resolved here at construction time.
    pub fn new(thickness_m: f64, texture: Texture, initial_vwc: f64, acc_thickness_m: f64) -> Self {
        let swc = texture::derive(&texture);
        let vwc = if initial_vwc < 0.0 {
            match initial_vwc.round() as i64 {
                -1 => swc.pwp,
                -2 => swc.fc,
                -3 => swc.sat,
                _ => swc.fc,
            }
        } else {
            initial_vwc.clamp(swc.pwp, swc.sat)
        };
        let depth_m = acc_thickness_m - thickness_m / 2.0;
        SoilLayer {
            thickness_m,
            texture,
            swc,
            vwc,
            acc_thickness_m,
            depth_m,
            conductivity: swc.ksat,
            matric_head_m: 0.0,
            gravity_head_m: depth_m,
            flux_t: 0.0,
            flux_e: 0.0,
            flux_influx: 0.0,
            flux_outflux: 0.0,
            flux_netflux: 0.0,
        }
    }

    /// Recompute matric head (Brooks-Corey) and conductivity from the
    /// current water content. Gravity head is static (layer mid-depth).
    pub fn recompute_heads(&mut self) {
        let saturation = ((self.vwc - self.swc.pwp) / (self.swc.sat - self.swc.pwp).max(1e-6))
            .clamp(1.0e-3, 1.0);
        self.matric_head_m = self.swc.airentry / 100.0 * saturation.powf(-1.0 / self.swc.psd.max(1e-6));
        self.conductivity =
            self.swc.ksat * saturation.powf(3.0 + 2.0 / self.swc.psd.max(1e-6));
    }

    pub fn total_head_m(&self) -> f64 {
        self.matric_head_m + self.gravity_head_m
    }

    /// Reset the per-day cumulative fluxes, called once on the first
    /// sub-step of a day.
    pub fn reset_daily_fluxes(&mut self) {
        self.flux_t = 0.0;
        self.flux_e = 0.0;
        self.flux_influx = 0.0;
        self.flux_outflux = 0.0;
        self.flux_netflux = 0.0;
    }

    /// Clamp `vwc` to `[pwp, sat]`, returning the overflow/deficit (positive
    /// = excess pushed upward, negative = deficit to draw from above).
    pub fn clamp_vwc(&mut self) -> f64 {
        if self.vwc > self.swc.sat {
            let excess = self.vwc - self.swc.sat;
            self.vwc = self.swc.sat;
            excess
        } else if self.vwc < self.swc.pwp {
            let deficit = self.vwc - self.swc.pwp;
            self.vwc = self.swc.pwp;
            deficit
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_texture() -> Texture {
        Texture { clay_pct: 25.0, sand_pct: 40.0, om_pct: 3.0 }
    }

    #[test]
    fn negative_initial_vwc_resolves_to_named_points() {
        let pwp_layer = SoilLayer::new(0.2, sample_texture(), -1.0, 0.2);
        let fc_layer = SoilLayer::new(0.2, sample_texture(), -2.0, 0.2);
        let sat_layer = SoilLayer::new(0.2, sample_texture(), -3.0, 0.2);
        assert_eq!(pwp_layer.vwc, pwp_layer.swc.pwp);
        assert_eq!(fc_layer.vwc, fc_layer.swc.fc);
        assert_eq!(sat_layer.vwc, sat_layer.swc.sat);
    }

    #[test]
    fn recompute_heads_increases_conductivity_as_wetter() {
        let mut dry = SoilLayer::new(0.2, sample_texture(), -1.0, 0.2);
        let mut wet = SoilLayer::new(0.2, sample_texture(), -3.0, 0.2);
        dry.recompute_heads();
        wet.recompute_heads();
        assert!(wet.conductivity > dry.conductivity);
    }

    #[test]
    fn clamp_vwc_reports_excess_and_deficit() {
        let mut layer = SoilLayer::new(0.2, sample_texture(), -2.0, 0.2);
        layer.vwc = layer.swc.sat + 0.05;
        let excess = layer.clamp_vwc();
        assert!((excess - 0.05).abs() < 1e-9);
        assert_eq!(layer.vwc, layer.swc.sat);

        layer.vwc = layer.swc.pwp - 0.03;
        let deficit = layer.clamp_vwc();
        assert!((deficit + 0.03).abs() < 1e-9);
        assert_eq!(layer.vwc, layer.swc.pwp);
    }
}
