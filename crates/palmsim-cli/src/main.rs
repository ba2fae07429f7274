use std::process::ExitCode;

use clap::Parser;
use palmsim_cli::cli::{Cli, Commands};
use palmsim_cli::commands::{met, net, run};
use palmsim_core::Error;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Met(args) => met::run(args),
        Commands::Net(args) => net::run(args),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(err @ Error::Input(_)) => {
            error!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(1)
        }
    }
}
