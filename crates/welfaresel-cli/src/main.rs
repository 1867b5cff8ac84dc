use std::io;

use clap::Parser;
use welfaresel_cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => {
            // JSON output keeps stdout free of log lines.
            if !args.json {
                welfaresel_console::init();
            }
            let stdout = io::stdout();
            welfaresel_cli::solve(&args, &mut stdout.lock())?;
        }
    }
    Ok(())
}
