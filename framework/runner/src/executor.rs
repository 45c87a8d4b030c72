use std::path::PathBuf;
use std::process::Command;

use sweep_core::prelude::{ConfigError, Invocation, PlannedScenario, TagStyle};

use crate::config::HarnessConfig;
use crate::timing::{Timing, TimingExtractor};

/// Returned for a scenario whose tool invocation did not succeed.
///
/// The failure only affects its own scenario, the run carries on with the next one.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq)]
#[display("scenario {index} failed: {reason}")]
pub struct ScenarioFailure {
    pub index: usize,
    /// The exit status or the reason the tool could not be started.
    pub reason: String,
    /// Standard error of the tool, empty if it never started.
    pub stderr: String,
}

/// The result of executing one scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    Success { output_path: PathBuf, timing: Timing },
    Failure(ScenarioFailure),
}

/// A scenario that is ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedScenario {
    pub index: usize,
    pub invocation: Invocation,
    pub file_name: String,
    pub output_path: PathBuf,
}

/// Runs the enhancement tool, one scenario at a time.
#[derive(Debug)]
pub struct Executor {
    executable: PathBuf,
    base_args: Vec<String>,
    output_dir: PathBuf,
    tag_style: TagStyle,
    timing: TimingExtractor,
}

impl Executor {
    pub fn new(executable: PathBuf, harness: &HarnessConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            executable,
            base_args: harness.base_args(),
            output_dir: harness.output_dir.clone(),
            tag_style: harness.tag_style,
            timing: TimingExtractor::new(&harness.timing_pattern)?,
        })
    }

    /// Build the arguments and output location for a planned scenario.
    pub fn prepare(&self, planned: &PlannedScenario<'_>) -> PreparedScenario {
        let invocation = Invocation::build(&self.base_args, &planned.scenario, self.tag_style);
        let file_name = invocation.file_name(planned.index);
        let output_path = self.output_dir.join(&file_name);

        PreparedScenario {
            index: planned.index,
            invocation,
            file_name,
            output_path,
        }
    }

    /// The full command line for a prepared scenario, for display.
    pub fn command_line(&self, prepared: &PreparedScenario) -> String {
        std::iter::once(self.executable.to_string_lossy().into_owned())
            .chain(prepared.invocation.args.iter().cloned())
            .chain([
                "-o".to_string(),
                prepared.output_path.to_string_lossy().into_owned(),
            ])
            .map(|arg| quote_arg(&arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the tool for a prepared scenario and wait for it to exit.
    ///
    /// This never returns an error, failures are reported as [ScenarioOutcome::Failure].
    pub fn execute(&self, prepared: &PreparedScenario) -> ScenarioOutcome {
        log::debug!("Running: {}", self.command_line(prepared));

        let output = match Command::new(&self.executable)
            .args(&prepared.invocation.args)
            .arg("-o")
            .arg(&prepared.output_path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return ScenarioOutcome::Failure(ScenarioFailure {
                    index: prepared.index,
                    reason: format!(
                        "failed to start '{}': {e}",
                        self.executable.display()
                    ),
                    stderr: String::new(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!("Scenario {} stdout:\n{stdout}", prepared.index);

        if !output.status.success() {
            return ScenarioOutcome::Failure(ScenarioFailure {
                index: prepared.index,
                reason: format!("tool exited with {}", output.status),
                stderr: stderr.into_owned(),
            });
        }

        let timing = self.timing.extract(&stdout);
        if timing == Timing::NotAvailable {
            log::debug!("No timing report found for scenario {}", prepared.index);
        }

        ScenarioOutcome::Success {
            output_path: prepared.output_path.clone(),
            timing,
        }
    }
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.,:/+=@".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
