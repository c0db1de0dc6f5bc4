//! Timekeep command-line front end
//!
//! Aggregates the per-worker timer files written by instrumented runs

mod cli;
mod log;
mod report;

use anyhow::{Context, Result};
use timekeep_services::Settings;

use crate::cli::{Action, Cli};
use crate::report::{render, ScalingReport, SummaryReport, TimerReport};

fn run(action: &Action, settings: &Settings) -> Result<String> {
    match action {
        Action::Show { file } => render(&TimerReport::load(file)?, settings),
        Action::Summary { dir } => render(&SummaryReport::load(dir)?, settings),
        Action::Scaling { dirs } => render(&ScalingReport::load(dirs.as_slice())?, settings),
    }
}

fn main() -> Result<()> {
    let cli = Cli::load()?;

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => Settings::default(),
    };
    cli.apply(&mut settings);

    log::init_tracing(&settings.log_level());
    tracing::debug!("Timekeep v{}", timekeep_core::VERSION);

    let output = run(&cli.action, &settings)?;
    println!("{}", output.trim_end());

    Ok(())
}
