//! WelfareSel command-line front end.
//!
//! `welfaresel solve --data cows.csv` loads the dataset, solves the selection
//! and prints a report, or JSON with `--json`.

pub mod cli;
pub mod dataset;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use welfaresel::{SelectionConfig, SelectionSolution, SelectionSolver, CONFIG_FILE};
use welfaresel_console::{render_report, CoverageChart, PlotDirectory};

pub use cli::{Cli, Commands, SolveArgs};

/// Base name of the saved coverage chart.
pub const CHART_NAME: &str = "indicator_coverage";

/// Resolves the configuration: an explicit file must load, the default file
/// is used when present, and built-in defaults apply otherwise.
pub fn resolve_config(args: &SolveArgs) -> Result<SelectionConfig> {
    let mut config = match &args.config {
        Some(path) => SelectionConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None if Path::new(CONFIG_FILE).exists() => SelectionConfig::load(CONFIG_FILE)
            .with_context(|| format!("failed to load configuration {CONFIG_FILE}"))?,
        None => SelectionConfig::default(),
    };
    if let Some(target) = args.target_count {
        config.target_count = target;
    }
    Ok(config)
}

/// Runs `solve`, writing the result to `out`.
pub fn solve(args: &SolveArgs, out: &mut dyn Write) -> Result<SelectionSolution> {
    let config = resolve_config(args)?;
    let catalog = dataset::load_catalog(&args.data)
        .with_context(|| format!("failed to read dataset {}", args.data.display()))?;

    info!(
        indicators = catalog.indicator_count(),
        hazards = catalog.hazards().len(),
        consequences = catalog.consequences().len(),
        "Dataset loaded"
    );

    let solution = SelectionSolver::new(config)
        .solve(&catalog)
        .context("indicator selection failed")?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &solution)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_report(&solution))?;
    }

    if args.plot {
        let chart = CoverageChart::from_solution(&solution, &catalog);
        let path = PlotDirectory::new(&args.plot_dir)
            .save(&chart, CHART_NAME, None)
            .context("failed to save coverage chart")?;
        if !args.json {
            writeln!(out, "\nCoverage chart saved to {}", path.display())?;
        }
    }

    Ok(solution)
}
