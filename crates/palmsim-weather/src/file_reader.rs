//! CSV-backed cyclic weather file reader.
//!
//! The format is idiosyncratic enough (mixed `,`/`;` delimiters, `#`-prefixed
//! comment prelude, `*`-prefixed key-field header tokens) that we parse it by
//! hand line-by-line rather than forcing the generic `csv` crate to fit.

use std::fs;
use std::path::Path;

use palmsim_core::{Error, Result};
use tracing::debug;

use crate::annual::{AnnualWeather, WeatherRecord};
use crate::source::WeatherSource;

/// All records parsed from a weather file, plus the header metadata needed
/// to slice them into yearly blocks.
pub struct WeatherFile {
    header: Vec<String>,
    key_fields: Vec<String>,
    rows: Vec<Vec<f64>>,
}

fn detect_delimiter(line: &str) -> char {
    if line.contains(';') {
        ';'
    } else {
        ','
    }
}

impl WeatherFile {
    /// `load()`: materialise all records from a weather file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Input(format!("cannot read weather file {}: {e}", path.display())))?;

        let mut lines = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

        let header_line = lines
            .next()
            .ok_or_else(|| Error::Input("weather file has no header line".into()))?;
        let delim = detect_delimiter(header_line);
        let raw_header: Vec<&str> = header_line.split(delim).map(str::trim).collect();

        let mut header = Vec::with_capacity(raw_header.len());
        let mut key_fields = Vec::new();
        for tok in &raw_header {
            if let Some(name) = tok.strip_prefix('*') {
                key_fields.push(name.to_string());
                header.push(name.to_string());
            } else {
                header.push(tok.to_string());
            }
        }

        let mut rows = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split(delim).map(str::trim).collect();
            if fields.len() != header.len() {
                return Err(Error::Input(format!(
                    "weather file record has {} fields, header has {}",
                    fields.len(),
                    header.len()
                )));
            }
            let mut row = Vec::with_capacity(fields.len());
            for f in fields {
                row.push(f.parse::<f64>().map_err(|_| {
                    Error::Input(format!("non-numeric weather field '{f}'"))
                })?);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(Error::Input("weather file has no data rows".into()));
        }

        debug!(rows = rows.len(), "loaded weather file");
        Ok(WeatherFile {
            header,
            key_fields,
            rows,
        })
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Build the `AnnualWeather` block for year index `year` (0-based), given `nsets` rows/year.
    pub fn year_block(&self, year: usize, nsets: usize) -> Result<AnnualWeather> {
        if self.rows.len() % nsets != 0 {
            return Err(Error::Input(format!(
                "weather file has {} records, not a multiple of nsets={}",
                self.rows.len(),
                nsets
            )));
        }
        let num_years = self.rows.len() / nsets;
        let year = year % num_years;
        let start = year * nsets;
        let records: Vec<WeatherRecord> = self.rows[start..start + nsets]
            .iter()
            .map(|row| {
                self.header
                    .iter()
                    .cloned()
                    .zip(row.iter().copied())
                    .collect()
            })
            .collect();
        Ok(AnnualWeather::new(records, self.key_fields.clone()))
    }

    pub fn num_years(&self, nsets: usize) -> usize {
        self.rows.len() / nsets.max(1)
    }
}

/// A cyclic, file-backed weather source. `update(year)` swaps in a fresh
/// annual block; `year <= 0` (via [`WeatherFileReader::advance_year`]) moves
/// to the next block, wrapping after the last.
pub struct WeatherFileReader {
    file: WeatherFile,
    nsets: usize,
    current_year: usize,
    current: AnnualWeather,
    cursor: usize,
}

impl WeatherFileReader {
    pub fn open(path: impl AsRef<Path>, nsets: usize) -> Result<Self> {
        let file = WeatherFile::load(path)?;
        let current = file.year_block(0, nsets)?;
        Ok(WeatherFileReader {
            file,
            nsets,
            current_year: 0,
            current,
            cursor: 0,
        })
    }

    /// Populate the current annual table from the given year's block (0-based).
    /// Negative-or-zero `year` advances to the next block cyclically.
    pub fn update(&mut self, year: i64) -> Result<()> {
        if year > 0 {
            self.current_year = (year as usize) % self.file.num_years(self.nsets);
        } else {
            self.current_year = (self.current_year + 1) % self.file.num_years(self.nsets);
        }
        self.current = self.file.year_block(self.current_year, self.nsets)?;
        self.cursor = 0;
        Ok(())
    }

    pub fn current_annual(&self) -> &AnnualWeather {
        &self.current
    }
}

impl WeatherSource for WeatherFileReader {
    fn next_day(&mut self) -> Result<WeatherRecord> {
        if self.cursor >= self.nsets {
            self.update(0)?;
        }
        let record = self
            .current
            .record(self.cursor)
            .cloned()
            .ok_or_else(|| Error::Input("weather cursor out of range".into()))?;
        self.cursor += 1;
        Ok(record)
    }

    fn nsets(&self) -> usize {
        self.nsets
    }
}
