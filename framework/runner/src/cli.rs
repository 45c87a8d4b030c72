use std::path::PathBuf;

use clap::Parser;

use crate::config::HarnessConfig;
use crate::run::RunOptions;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct SweepCli {
    /// The experiment file describing the harness settings and the parameter grid
    #[clap(short, long)]
    pub config: PathBuf,

    /// The enhancement tool to run, overriding the experiment file.
    ///
    /// The `ITE_SWEEP_TOOL_PATH` environment variable takes precedence over both.
    #[clap(long)]
    pub executable: Option<PathBuf>,

    /// The input image, overriding the experiment file
    #[clap(short, long)]
    pub input: Option<PathBuf>,

    /// The directory to write results to, overriding the experiment file
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// The number of columns in the comparison mosaic
    #[clap(long)]
    pub columns: Option<usize>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// Do not render the comparison mosaic after the scenarios have run
    #[clap(long, default_value = "false")]
    pub no_mosaic: bool,

    /// Open the comparison mosaic in the platform image viewer once it is written
    #[clap(long, default_value = "false")]
    pub show: bool,

    /// Print the command line of every scenario without running anything
    #[clap(long, default_value = "false")]
    pub dry_run: bool,
}

impl SweepCli {
    /// Apply the command line overrides on top of the experiment file settings.
    pub fn apply(&self, harness: &mut HarnessConfig) {
        if let Some(executable) = &self.executable {
            harness.executable = executable.clone();
        }
        if let Some(input) = &self.input {
            harness.input_path = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            // A mosaic path from the file is kept, the default one follows the new directory.
            harness.output_dir = output_dir.clone();
        }
        if let Some(columns) = self.columns {
            harness.columns = columns;
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            no_progress: self.no_progress,
            no_mosaic: self.no_mosaic,
            show: self.show,
            dry_run: self.dry_run,
        }
    }
}
