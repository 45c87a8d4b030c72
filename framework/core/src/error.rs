/// Errors in the definition of an experiment.
///
/// Any of these aborts the run before a single scenario is executed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("parameter '{name}' has no candidate values")]
    EmptyParameter { name: String },
    #[error("parameter '{name}' is defined more than once")]
    DuplicateParameter { name: String },
    #[error("invalid parameter name '{name}': {reason}")]
    InvalidParameterName { name: String, reason: &'static str },
    #[error("invalid range for parameter '{name}': {reason}")]
    InvalidRange { name: String, reason: String },
    #[error("unsupported value for parameter '{name}': {kind}")]
    UnsupportedValue { name: String, kind: String },
    #[error("the experiment defines no scenarios")]
    NoScenarios,
    #[error("the experiment defines too many scenarios to enumerate")]
    TooManyScenarios,
    #[error("invalid timing pattern: {0}")]
    TimingPattern(String),
    #[error("invalid harness setting '{setting}': {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },
}
