use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::collector::ResultCollector;

#[derive(Tabled, Debug, Clone, PartialEq)]
pub struct ScenarioRow {
    pub index: usize,
    pub outcome: &'static str,
    pub timing: String,
    pub tags: String,
}

/// One row per executed scenario, successes and failures together, in scenario order.
pub fn summary_rows(collector: &ResultCollector) -> Vec<ScenarioRow> {
    let successes = collector.records().iter().map(|record| ScenarioRow {
        index: record.index,
        outcome: "ok",
        timing: record.timing.to_string(),
        tags: single_line(&record.label),
    });
    let failures = collector.failures().iter().map(|failed| ScenarioRow {
        index: failed.failure.index,
        outcome: "failed",
        timing: "-".to_string(),
        tags: single_line(&failed.label),
    });

    let mut rows = successes.chain(failures).collect::<Vec<_>>();
    rows.sort_by_key(|row| row.index);
    rows
}

fn single_line(label: &str) -> String {
    label.lines().collect::<Vec<_>>().join(" ")
}

pub fn print_summary(collector: &ResultCollector) {
    let rows = summary_rows(collector);
    if rows.is_empty() {
        return;
    }

    println!("\nSummary of scenarios");
    let mut table = Table::new(&rows);
    table.with(Style::modern());

    println!("{}", table);
}
