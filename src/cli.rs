//! Command Line Interface
//! Subcommands for inspecting datasets and recomputing chart tables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::stats::ALL_SENTINEL;

#[derive(Parser, Debug)]
#[command(
    name = "painel",
    version,
    about = "Municipal labor-market and GDP dashboard data engine"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Directory holding the CSV snapshots")]
    pub data_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Verbose debug logging")]
    pub debug: bool,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load every dataset and report its shape
    Check,
    /// List the dashboard's charts
    Charts,
    /// List dropdown options for a filter input
    Options { input: String },
    /// Compute one chart for a selection
    Chart {
        chart: String,
        #[arg(long, default_value = ALL_SENTINEL)]
        select: String,
    },
    /// Dispatch a filter interaction by input id
    Input { input: String, value: String },
}
