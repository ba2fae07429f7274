//! `palmsim met`: compute per-field summary statistics (count, mean,
//! standard deviation, min, max) over the full cyclic weather record.

use std::collections::BTreeMap;
use std::fs::File;

use palmsim_core::{Error, Result};
use palmsim_weather::WeatherFile;
use tracing::info;

use crate::cli::MetArgs;

#[derive(Default)]
struct FieldAccumulator {
    count: usize,
    sum: f64,
    sum_sq: f64,
    min: f64,
    max: f64,
}

impl FieldAccumulator {
    fn observe(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count.max(1) as f64
    }

    fn stddev(&self) -> f64 {
        let mean = self.mean();
        let variance = (self.sum_sq / self.count.max(1) as f64 - mean * mean).max(0.0);
        variance.sqrt()
    }
}

pub fn run(args: &MetArgs) -> Result<()> {
    let file = WeatherFile::load(&args.weather)?;
    let num_years = file.num_years(args.nsets);
    if num_years == 0 {
        return Err(Error::Input("weather file has no complete years at the given nsets".into()));
    }

    let mut fields: BTreeMap<String, FieldAccumulator> = BTreeMap::new();
    for year in 0..num_years {
        let block = file.year_block(year, args.nsets)?;
        for i in 0..block.nsets() {
            let record = block.record(i).expect("index within nsets bounds");
            for (field, value) in record {
                fields.entry(field.clone()).or_default().observe(*value);
            }
        }
    }

    let out = File::create(&args.out)
        .map_err(|e| Error::Input(format!("cannot create output file {}: {e}", args.out)))?;
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["field", "count", "mean", "stddev", "min", "max"])
        .map_err(|e| Error::Csv(e.to_string()))?;
    for (field, acc) in &fields {
        writer
            .write_record([
                field.clone(),
                acc.count.to_string(),
                format!("{:.6}", acc.mean()),
                format!("{:.6}", acc.stddev()),
                format!("{:.6}", acc.min),
                format!("{:.6}", acc.max),
            ])
            .map_err(|e| Error::Csv(e.to_string()))?;
    }
    writer.flush().map_err(Error::Io)?;

    info!(years = num_years, fields = fields.len(), out = %args.out, "met statistics written");
    Ok(())
}
