use std::path::PathBuf;

use crate::executor::ScenarioFailure;
use crate::timing::Timing;

/// The output of one successful scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub index: usize,
    pub output_path: PathBuf,
    /// The scenario tags, one per line.
    pub label: String,
    pub timing: Timing,
}

impl ResultRecord {
    /// The mosaic cell title: the label lines followed by the timing.
    pub fn title_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.label
            .lines()
            .map(str::to_string)
            .chain(std::iter::once(self.timing.to_string()))
    }
}

/// A scenario that did not produce a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedScenario {
    pub label: String,
    pub failure: ScenarioFailure,
}

/// Append only, ordered collection of scenario results.
#[derive(Debug, Default)]
pub struct ResultCollector {
    records: Vec<ResultRecord>,
    failures: Vec<FailedScenario>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn record_failure(&mut self, failed: FailedScenario) {
        self.failures.push(failed);
    }

    /// Successful results in scenario order.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[FailedScenario] {
        &self.failures
    }

    /// Number of successful results.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_parts(self) -> (Vec<ResultRecord>, Vec<FailedScenario>) {
        (self.records, self.failures)
    }
}
