use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "welfaresel", version, about = "Welfare indicator selection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select indicators from a dataset
    Solve(SolveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[arg(long, help = "Dataset CSV, one row per indicator/hazard/consequence")]
    pub data: PathBuf,

    #[arg(
        long,
        help = "Configuration file (.toml, .yaml or .yml); defaults to ./welfaresel.toml if present"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Number of indicators to select, overrides the configuration")]
    pub target_count: Option<usize>,

    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,

    #[arg(long, help = "Save a coverage chart")]
    pub plot: bool,

    #[arg(long, default_value = welfaresel_console::plots::DEFAULT_DIRECTORY)]
    pub plot_dir: PathBuf,
}
