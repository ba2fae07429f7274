//! `palmsim net`: emit a Graphviz `.dot` graph of the driver's fixed
//! per-day stepping order. Diagnostic only, not part of the core simulation.

use std::fs;

use palmsim_core::{Error, Result};
use tracing::info;

use crate::cli::NetArgs;

const FLOW_EDGES: &[(&str, &str)] = &[
    ("weather", "meteorology"),
    ("meteorology", "photosynthesis_set_day"),
    ("soil_root_front", "soil_water"),
    ("soil_water", "energy_balance_daily"),
    ("energy_balance_daily", "hourly_loop"),
    ("hourly_loop", "energy_balance_hourly"),
    ("hourly_loop", "photosynthesis_hourly"),
    ("energy_balance_hourly", "photosynthesis_hourly"),
    ("hourly_loop", "crop_update"),
    ("soil_water", "crop_update"),
];

pub fn run(args: &NetArgs) -> Result<()> {
    let mut dot = String::from("digraph palmsim_stepping_order {\n");
    for (from, to) in FLOW_EDGES {
        dot.push_str(&format!("    \"{from}\" -> \"{to}\";\n"));
    }
    dot.push_str("}\n");

    fs::write(&args.out, dot)
        .map_err(|e| Error::Input(format!("cannot write graph file {}: {e}", args.out)))?;
    info!(out = %args.out, "flow graph written");
    Ok(())
}
