//! Command-line argument structures (clap derive).

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "palmsim", version, about = "Oil-palm stand growth and yield simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Tracing verbosity: error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate a run and write one output row per day (or per hour).
    Run(RunArgs),
    /// Compute and write weather statistics over the full weather record.
    Met(MetArgs),
    /// Produce a program-flow graph of the stepping order (diagnostic only).
    Net(NetArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the plain-text key=value initialization file.
    #[arg(long)]
    pub init: String,

    /// Path to the weather file read by the file-backed weather source.
    #[arg(long)]
    pub weather: String,

    /// Number of days to simulate.
    #[arg(long, default_value_t = 365)]
    pub days: u32,

    /// Number of weather records per year (`nsets`).
    #[arg(long, default_value_t = 365)]
    pub nsets: usize,

    /// Emit one row per hour instead of one row per day.
    #[arg(long, default_value_t = false)]
    pub hourly: bool,

    /// Output CSV path; written incrementally as the run progresses.
    #[arg(long)]
    pub out: String,

    /// Optional auxiliary-attribute output CSV; one column per `--aux-path`.
    #[arg(long)]
    pub aux_out: Option<String>,

    /// Dotted attribute path resolved each day into the auxiliary file
    /// (e.g. `parts.trunk.maint`, `layers[1].fluxes["influx"]`). Repeatable.
    #[arg(long = "aux-path")]
    pub aux_paths: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct MetArgs {
    /// Path to the weather file to summarise.
    #[arg(long)]
    pub weather: String,

    /// Number of records per year (`nsets`).
    #[arg(long, default_value_t = 365)]
    pub nsets: usize,

    /// Output CSV path for the per-field monthly/overall statistics.
    #[arg(long)]
    pub out: String,
}

#[derive(clap::Args, Debug)]
pub struct NetArgs {
    /// Output path for the Graphviz `.dot` flow graph.
    #[arg(long)]
    pub out: String,
}
