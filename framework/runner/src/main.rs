use anyhow::Context;
use clap::Parser;
use sweep_runner::prelude::*;

fn main() -> SweepResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = SweepCli::parse();

    let mut experiment = ExperimentFile::load(&cli.config)?
        .into_experiment()
        .with_context(|| format!("Invalid experiment file {}", cli.config.display()))?;
    cli.apply(&mut experiment.harness);
    experiment
        .harness
        .validate()
        .context("Invalid command line override")?;

    let report = run(&experiment, cli.run_options())?;
    if !report.failures.is_empty() {
        log::warn!("{} of {} scenarios failed", report.failures.len(), report.total);
    }

    Ok(())
}
