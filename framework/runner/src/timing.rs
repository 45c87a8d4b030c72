use std::fmt::{Display, Formatter};

use regex::Regex;
use sweep_core::prelude::ConfigError;

/// The timing report printed by the enhancement tool when it is run with `-t`.
///
/// The first capture group is the recorded value.
pub const DEFAULT_TIMING_PATTERN: &str = r"Enhancement time:\s*([0-9]+(?:\.[0-9]+)?)\s*s";

/// The timing of one scenario, as reported by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timing {
    /// Seconds, exactly as printed by the tool.
    Seconds(String),
    /// The tool output did not contain a timing report.
    NotAvailable,
}

impl Display for Timing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Timing::Seconds(s) => write!(f, "{s} s"),
            Timing::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Finds the timing report in the standard output of the tool.
#[derive(Debug, Clone)]
pub struct TimingExtractor {
    pattern: Regex,
}

impl TimingExtractor {
    /// Compile a timing pattern. The pattern must have at least one capture group.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern =
            Regex::new(pattern).map_err(|e| ConfigError::TimingPattern(e.to_string()))?;
        if pattern.captures_len() < 2 {
            return Err(ConfigError::TimingPattern(format!(
                "'{pattern}' has no capture group for the timing value"
            )));
        }

        Ok(Self { pattern })
    }

    /// Extract the first timing report from `stdout`.
    ///
    /// A missing report is not an error, it is recorded as [Timing::NotAvailable].
    pub fn extract(&self, stdout: &str) -> Timing {
        self.pattern
            .captures(stdout)
            .and_then(|captures| captures.get(1))
            .map(|m| Timing::Seconds(m.as_str().to_string()))
            .unwrap_or(Timing::NotAvailable)
    }
}

impl Default for TimingExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMING_PATTERN).expect("built-in timing pattern must compile")
    }
}
