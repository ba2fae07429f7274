//! `palmsim run`: simulate and write one output row per day, or per hour
//! when `--hourly` is set.

use palmsim_core::Result;
use palmsim_driver::Driver;
use palmsim_weather::WeatherFileReader;
use tracing::info;

use crate::cli::RunArgs;
use crate::initfile::{build_sim_config, InitFile};
use crate::writer::{AuxWriter, RunWriter};

pub fn run(args: &RunArgs) -> Result<()> {
    let init = InitFile::load(&args.init)?;
    let config = build_sim_config(init)?;
    let num_layers = config.soil_layers.len();

    let weather = WeatherFileReader::open(&args.weather, args.nsets)?;
    let mut driver = Driver::new(config, Box::new(weather))?;

    // Soil layers integrate once per day; hourly rows carry no layer columns
    // so their field count still matches `OutputRow::header`.
    let header_layers = if args.hourly { 0 } else { num_layers };
    let mut out = RunWriter::create(&args.out, header_layers, args.hourly)?;
    let mut aux = match &args.aux_out {
        Some(path) if !args.aux_paths.is_empty() => Some(AuxWriter::create(path, args.aux_paths.clone())?),
        Some(_) => {
            info!("--aux-out given without any --aux-path; no auxiliary file will be written");
            None
        }
        None => None,
    };

    for day in 0..args.days {
        let row = driver.step_day()?;
        if args.hourly {
            for hourly_row in driver.hourly_rows() {
                out.write_row(hourly_row)?;
            }
        } else {
            out.write_row(&row)?;
        }
        if let Some(aux_writer) = aux.as_mut() {
            aux_writer.write_row(row.doy, |path| driver.resolve_aux(path))?;
        }
        if day % 30 == 0 {
            info!(day, lai = row.lai, assim_kg = row.canopy_assim_kg, "run progress");
        }
    }

    out.flush()?;
    if let Some(aux_writer) = aux.as_mut() {
        aux_writer.flush()?;
    }
    info!(days = args.days, out = %args.out, "run complete");
    Ok(())
}
