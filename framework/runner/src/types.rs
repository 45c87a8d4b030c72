/// Result type used throughout the runner and by the `ite-sweep` binary. Compatible with
/// [sweep_core::prelude::ConfigError] and any other error through `?`.
pub type SweepResult<T> = anyhow::Result<T>;
