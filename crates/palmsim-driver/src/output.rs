//! Run output rows: one per day (or per hour in hourly mode), including the
//! per-layer water content and flux columns whose count depends on the
//! configured soil profile.

/// Per-layer output columns for one day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerOutput {
    pub vwc: f64,
    pub influx: f64,
    pub outflux: f64,
    pub netflux: f64,
}

/// One output row: driving weather, daily ET components, canopy
/// assimilation, per-layer water state, crop weights, yield, height, LAI.
#[derive(Debug, Clone)]
pub struct OutputRow {
    pub doy: u16,
    pub hour: Option<f64>,
    pub tmin: f64,
    pub tmax: f64,
    pub rain_mm: f64,
    pub wind: f64,
    pub et_crop_mm: f64,
    pub et_soil_mm: f64,
    pub et_total_mm: f64,
    pub canopy_assim_kg: f64,
    pub layers: Vec<LayerOutput>,
    pub vdm_kg: f64,
    pub tdm_kg: f64,
    pub bunch_yield_kg: f64,
    pub tree_height_m: f64,
    pub lai: f64,
}

impl OutputRow {
    /// Header row. `num_layers` must match `self.layers.len()` for every row
    /// written in the same run (the soil profile's layer count is fixed for
    /// a run).
    pub fn header(num_layers: usize, hourly: bool) -> Vec<String> {
        let mut cols = vec!["doy".to_string()];
        if hourly {
            cols.push("hour".to_string());
        }
        cols.extend(
            ["tmin", "tmax", "rain", "wind", "et_crop", "et_soil", "et_total", "canopy_assim"]
                .iter()
                .map(|s| s.to_string()),
        );
        for i in 0..num_layers {
            cols.push(format!("layer{i}_vwc"));
            cols.push(format!("layer{i}_influx"));
            cols.push(format!("layer{i}_outflux"));
            cols.push(format!("layer{i}_netflux"));
        }
        cols.extend(
            ["vdm", "tdm", "bunchyield", "height", "lai"].iter().map(|s| s.to_string()),
        );
        cols
    }

    /// Render this row as strings matching [`Self::header`]'s column order.
    pub fn to_record(&self) -> Vec<String> {
        let mut rec = vec![self.doy.to_string()];
        if let Some(h) = self.hour {
            rec.push(format!("{h:.4}"));
        }
        rec.extend(
            [
                self.tmin,
                self.tmax,
                self.rain_mm,
                self.wind,
                self.et_crop_mm,
                self.et_soil_mm,
                self.et_total_mm,
                self.canopy_assim_kg,
            ]
            .iter()
            .map(|v| format!("{v:.6}")),
        );
        for layer in &self.layers {
            rec.push(format!("{:.6}", layer.vwc));
            rec.push(format!("{:.6}", layer.influx));
            rec.push(format!("{:.6}", layer.outflux));
            rec.push(format!("{:.6}", layer.netflux));
        }
        rec.extend(
            [self.vdm_kg, self.tdm_kg, self.bunch_yield_kg, self.tree_height_m, self.lai]
                .iter()
                .map(|v| format!("{v:.6}")),
        );
        rec
    }
}
