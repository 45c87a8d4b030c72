use std::path::PathBuf;

use anyhow::Context;

use crate::collector::{FailedScenario, ResultCollector, ResultRecord};
use crate::config::Experiment;
use crate::executor::{Executor, ScenarioOutcome};
use crate::mosaic::MosaicRenderer;
use crate::progress::ScenarioProgress;
use crate::summary::print_summary;
use crate::tool_path::resolve_tool_path;
use crate::types::SweepResult;
use crate::viewer::open_in_viewer;

/// Switches for a single run that are not part of the experiment definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Use a hidden progress bar.
    pub no_progress: bool,
    /// Skip rendering the comparison mosaic.
    pub no_mosaic: bool,
    /// Open the mosaic in the platform viewer once it is written.
    pub show: bool,
    /// Print the planned command lines and stop.
    pub dry_run: bool,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Number of planned scenarios.
    pub total: usize,
    /// Successful scenarios in execution order.
    pub records: Vec<ResultRecord>,
    pub failures: Vec<FailedScenario>,
    /// Where the mosaic was written, if one was rendered.
    pub mosaic_path: Option<PathBuf>,
}

/// Run every scenario of `experiment` in order, then summarise the run and render the mosaic.
///
/// A failing scenario does not stop the run. Errors are only returned for problems that affect
/// the run as a whole, such as a missing tool or an unwritable output directory.
pub fn run(experiment: &Experiment, options: RunOptions) -> SweepResult<RunReport> {
    let harness = &experiment.harness;
    let plan = &experiment.plan;
    let total = plan.len();

    let executable = match resolve_tool_path(&harness.executable) {
        Ok(path) => path,
        Err(e) if options.dry_run => {
            log::warn!("Could not resolve the enhancement tool, showing it as configured: {e:?}");
            harness.executable.clone()
        }
        Err(e) => return Err(e),
    };
    let executor = Executor::new(executable, harness)?;

    log::info!("Total scenarios to test: {total}");

    if options.dry_run {
        for planned in plan {
            let prepared = executor.prepare(&planned);
            println!(
                "[{}/{total}] ({}) {}",
                planned.index + 1,
                planned.group,
                executor.command_line(&prepared)
            );
        }

        return Ok(RunReport {
            total,
            records: Vec::new(),
            failures: Vec::new(),
            mosaic_path: None,
        });
    }

    std::fs::create_dir_all(&harness.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            harness.output_dir.display()
        )
    })?;

    let progress = ScenarioProgress::start(total, options.no_progress);
    let mut collector = ResultCollector::new();

    for planned in plan {
        let prepared = executor.prepare(&planned);
        let label = prepared.invocation.label();

        progress.set_message(&prepared.file_name);
        progress.suspend(|| {
            log::info!(
                "[{}/{total}] Generating: {}",
                planned.index + 1,
                prepared.file_name
            )
        });

        match executor.execute(&prepared) {
            ScenarioOutcome::Success {
                output_path,
                timing,
            } => collector.push(ResultRecord {
                index: prepared.index,
                output_path,
                label,
                timing,
            }),
            ScenarioOutcome::Failure(failure) => {
                progress.suspend(|| {
                    log::error!(
                        "Error running scenario {}: {}\n{}",
                        prepared.index,
                        failure.reason,
                        failure.stderr.trim_end()
                    )
                });
                collector.record_failure(FailedScenario { label, failure });
            }
        }

        progress.inc();
    }

    progress.finish();
    print_summary(&collector);
    println!(
        "Done! {}/{total} scenarios succeeded, results saved to '{}/'",
        collector.len(),
        harness.output_dir.display()
    );

    let (records, failures) = collector.into_parts();

    let mosaic_path = if options.no_mosaic {
        None
    } else {
        MosaicRenderer::new(harness.columns)
            .font_path(harness.font_path.clone())
            .render(&records, &harness.resolved_mosaic_path())
            .context("Failed to render the comparison mosaic")?
    };

    if options.show {
        match &mosaic_path {
            Some(path) => {
                if let Err(e) = open_in_viewer(path) {
                    log::warn!("Could not show the mosaic: {e:?}");
                }
            }
            None => log::warn!("No mosaic to show"),
        }
    }

    Ok(RunReport {
        total,
        records,
        failures,
        mosaic_path,
    })
}
