//! Annual weather table: an ordered, keyed per-day record set for one year.

use std::collections::HashMap;

/// One day's weather record: named field -> value (e.g. `tmin`, `tmax`, `wind`, `rain`, `sunhr`).
pub type WeatherRecord = HashMap<String, f64>;

/// A record set of `nsets` entries (typically 365), indexed 0-based ordinally within the year.
///
/// One or more fields may be tagged as key fields (used by the file reader to mark
/// `*`-prefixed header columns); `AnnualWeather` itself is agnostic to which fields
/// are keys, it just stores them alongside the rest.
#[derive(Debug, Clone)]
pub struct AnnualWeather {
    records: Vec<WeatherRecord>,
    key_fields: Vec<String>,
}

impl AnnualWeather {
    pub fn new(records: Vec<WeatherRecord>, key_fields: Vec<String>) -> Self {
        AnnualWeather { records, key_fields }
    }

    pub fn nsets(&self) -> usize {
        self.records.len()
    }

    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Fetch day `index` (0-based). Returns `None` if out of range.
    pub fn record(&self, index: usize) -> Option<&WeatherRecord> {
        self.records.get(index)
    }

    pub fn field(&self, index: usize, field: &str) -> Option<f64> {
        self.record(index).and_then(|r| r.get(field)).copied()
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(tmin: f64, tmax: f64) -> WeatherRecord {
        let mut r = WeatherRecord::new();
        r.insert("tmin".into(), tmin);
        r.insert("tmax".into(), tmax);
        r
    }

    #[test]
    fn indexes_records_by_ordinal_position() {
        let aw = AnnualWeather::new(vec![day(20.0, 30.0), day(21.0, 31.0)], vec!["tmin".into()]);
        assert_eq!(aw.nsets(), 2);
        assert_eq!(aw.field(1, "tmax"), Some(31.0));
        assert_eq!(aw.field(2, "tmax"), None);
    }
}
