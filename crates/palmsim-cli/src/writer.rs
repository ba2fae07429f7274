//! CSV writers for the run output and the auxiliary-attribute dump.

use std::fs::File;
use std::path::Path;

use palmsim_core::{Error, Result};
use palmsim_driver::OutputRow;

pub struct RunWriter {
    inner: csv::Writer<File>,
}

impl RunWriter {
    pub fn create(path: impl AsRef<Path>, num_layers: usize, hourly: bool) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| Error::Input(format!("cannot create output file {}: {e}", path.as_ref().display())))?;
        let mut inner = csv::Writer::from_writer(file);
        inner
            .write_record(OutputRow::header(num_layers, hourly))
            .map_err(|e| Error::Csv(e.to_string()))?;
        Ok(RunWriter { inner })
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.inner
            .write_record(row.to_record())
            .map_err(|e| Error::Csv(e.to_string()))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(Error::Io)
    }
}

/// Writes one row per simulated day: the day number plus one resolved
/// value per configured auxiliary attribute path.
pub struct AuxWriter {
    inner: csv::Writer<File>,
    paths: Vec<String>,
}

impl AuxWriter {
    pub fn create(path: impl AsRef<Path>, paths: Vec<String>) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| Error::Input(format!("cannot create aux file {}: {e}", path.as_ref().display())))?;
        let mut inner = csv::Writer::from_writer(file);
        let mut header = vec!["doy".to_string()];
        header.extend(paths.iter().cloned());
        inner.write_record(header).map_err(|e| Error::Csv(e.to_string()))?;
        Ok(AuxWriter { inner, paths })
    }

    pub fn write_row(&mut self, doy: u16, resolve: impl Fn(&str) -> Option<f64>) -> Result<()> {
        let mut record = vec![doy.to_string()];
        for path in &self.paths {
            let value = resolve(path).map(|v| format!("{v:.6}")).unwrap_or_default();
            record.push(value);
        }
        self.inner.write_record(record).map_err(|e| Error::Csv(e.to_string()))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(Error::Io)
    }
}
