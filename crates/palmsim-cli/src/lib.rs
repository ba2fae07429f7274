//! # palmsim-cli
//!
//! The `palmsim` binary's command surface: the `run`/`met`/`net` driver
//! modes, the plain-text init-file reader, and the CSV writers for run
//! output and auxiliary-attribute dumps.

pub mod cli;
pub mod commands;
pub mod initfile;
pub mod writer;

pub use cli::{Cli, Commands};
