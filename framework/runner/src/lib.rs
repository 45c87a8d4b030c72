mod cli;
mod collector;
mod config;
mod executor;
mod mosaic;
mod progress;
mod run;
mod summary;
mod timing;
mod tool_path;
mod types;
mod viewer;

pub mod prelude {
    pub use crate::cli::SweepCli;
    pub use crate::collector::{FailedScenario, ResultCollector, ResultRecord};
    pub use crate::config::{
        grid_from_table, Experiment, ExperimentFile, GroupSection, HarnessConfig, HarnessSection,
        TagStyleSetting, DEFAULT_COLUMNS, DEFAULT_EXECUTABLE, DEFAULT_MOSAIC_FILE_NAME,
        DEFAULT_OUTPUT_DIR, DEFAULT_TIMING_FLAG,
    };
    pub use crate::executor::{Executor, PreparedScenario, ScenarioFailure, ScenarioOutcome};
    pub use crate::mosaic::{fit_within, MosaicLayout, MosaicRenderer};
    pub use crate::progress::ScenarioProgress;
    pub use crate::run::{run, RunOptions, RunReport};
    pub use crate::summary::{print_summary, summary_rows, ScenarioRow};
    pub use crate::timing::{Timing, TimingExtractor, DEFAULT_TIMING_PATTERN};
    pub use crate::tool_path::{resolve_tool_path, ITE_SWEEP_TOOL_PATH_ENV};
    pub use crate::types::SweepResult;
    pub use crate::viewer::open_in_viewer;
}
