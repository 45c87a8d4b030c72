use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use sweep_core::prelude::{
    ConfigError, ParamValue, ParameterGrid, RangeBound, ScenarioGroup, ScenarioPlan, TagStyle,
    ValueRange,
};

use crate::timing::DEFAULT_TIMING_PATTERN;
use crate::types::SweepResult;

/// File name of the mosaic written into the output directory unless configured otherwise.
pub const DEFAULT_MOSAIC_FILE_NAME: &str = "comparison_grid.png";
pub const DEFAULT_OUTPUT_DIR: &str = "test_results";
pub const DEFAULT_EXECUTABLE: &str = "./ite";
pub const DEFAULT_COLUMNS: usize = 4;
pub const DEFAULT_TIMING_FLAG: &str = "-t";

/// Everything the harness needs to know about a run, apart from the scenarios themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// The image passed to the tool with `-i` for every scenario.
    pub input_path: PathBuf,
    /// Directory that scenario outputs and the mosaic are written to. Created if missing.
    pub output_dir: PathBuf,
    /// The enhancement tool, see [crate::tool_path::resolve_tool_path].
    pub executable: PathBuf,
    /// Number of mosaic columns.
    pub columns: usize,
    /// Flag asking the tool to print its timing report. `None` to not request one.
    pub timing_flag: Option<String>,
    /// Regex for the timing report, the first capture group is the value.
    pub timing_pattern: String,
    /// Arguments passed to every invocation, after the input and timing flags.
    pub fixed_args: Vec<String>,
    pub tag_style: TagStyle,
    /// Where to write the mosaic. Defaults to [DEFAULT_MOSAIC_FILE_NAME] in the output directory.
    pub mosaic_path: Option<PathBuf>,
    /// TrueType font for the mosaic titles.
    pub font_path: Option<PathBuf>,
}

impl HarnessConfig {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            columns: DEFAULT_COLUMNS,
            timing_flag: Some(DEFAULT_TIMING_FLAG.to_string()),
            timing_pattern: DEFAULT_TIMING_PATTERN.to_string(),
            fixed_args: Vec::new(),
            tag_style: TagStyle::default(),
            mosaic_path: None,
            font_path: None,
        }
    }

    /// Set `output_dir`
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set `executable`
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = path.into();
        self
    }

    /// Set `columns`
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Set `timing_flag`
    pub fn timing_flag(mut self, flag: Option<String>) -> Self {
        self.timing_flag = flag;
        self
    }

    /// Set `timing_pattern`
    pub fn timing_pattern(mut self, pattern: &str) -> Self {
        self.timing_pattern = pattern.to_string();
        self
    }

    /// Set `fixed_args`
    pub fn fixed_args(mut self, args: Vec<String>) -> Self {
        self.fixed_args = args;
        self
    }

    /// Set `tag_style`
    pub fn tag_style(mut self, style: TagStyle) -> Self {
        self.tag_style = style;
        self
    }

    /// Set `mosaic_path`
    pub fn mosaic_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mosaic_path = Some(path.into());
        self
    }

    /// Set `font_path`
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// The arguments shared by every invocation: `-i <input> [-t] [fixed args...]`.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            self.input_path.to_string_lossy().into_owned(),
        ];
        args.extend(self.timing_flag.iter().cloned());
        args.extend(self.fixed_args.iter().cloned());
        args
    }

    /// The path the mosaic is written to.
    pub fn resolved_mosaic_path(&self) -> PathBuf {
        self.mosaic_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join(DEFAULT_MOSAIC_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "columns",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidSetting {
                setting: "input",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// A configured harness together with the scenarios to run.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub harness: HarnessConfig,
    pub plan: ScenarioPlan,
}

/// The on-disk TOML experiment definition.
///
/// `[params]` is the base grid. Without any `[[groups]]` the plan is its cartesian product,
/// otherwise every group is merged with the base grid and the group products are concatenated.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentFile {
    pub harness: HarnessSection,
    #[serde(default)]
    pub params: toml::Table,
    #[serde(default)]
    pub groups: Vec<GroupSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessSection {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub executable: Option<PathBuf>,
    pub columns: Option<usize>,
    pub timing_flag: Option<String>,
    pub timing_pattern: Option<String>,
    #[serde(default)]
    pub fixed_args: Vec<String>,
    #[serde(default)]
    pub tag_style: TagStyleSetting,
    pub mosaic: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStyleSetting {
    #[default]
    Colon,
    Concat,
}

impl From<TagStyleSetting> for TagStyle {
    fn from(value: TagStyleSetting) -> Self {
        match value {
            TagStyleSetting::Colon => TagStyle::Colon,
            TagStyleSetting::Concat => TagStyle::Concat,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSection {
    pub name: String,
    #[serde(default)]
    pub params: toml::Table,
}

impl ExperimentFile {
    /// Read and parse an experiment file.
    pub fn load(path: &Path) -> SweepResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read experiment file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid experiment file {}", path.display()))
    }

    pub fn parse(content: &str) -> SweepResult<Self> {
        toml::from_str(content).context("Failed to parse experiment TOML")
    }

    /// Resolve the harness settings and plan the scenarios.
    pub fn into_experiment(self) -> Result<Experiment, ConfigError> {
        let section = self.harness;
        let mut harness = HarnessConfig::new(section.input)
            .fixed_args(section.fixed_args)
            .tag_style(section.tag_style.into());
        if let Some(dir) = section.output_dir {
            harness = harness.output_dir(dir);
        }
        if let Some(executable) = section.executable {
            harness = harness.executable(executable);
        }
        if let Some(columns) = section.columns {
            harness = harness.columns(columns);
        }
        if let Some(flag) = section.timing_flag {
            harness = harness.timing_flag(Some(flag).filter(|f| !f.is_empty()));
        }
        if let Some(pattern) = section.timing_pattern {
            harness = harness.timing_pattern(&pattern);
        }
        if let Some(mosaic) = section.mosaic {
            harness = harness.mosaic_path(mosaic);
        }
        if let Some(font) = section.font {
            harness = harness.font_path(font);
        }
        harness.validate()?;

        let base = grid_from_table(&self.params)?;
        let plan = if self.groups.is_empty() {
            ScenarioPlan::flat(base)?
        } else {
            let groups = self
                .groups
                .iter()
                .map(|group| {
                    Ok(ScenarioGroup {
                        name: group.name.clone(),
                        grid: grid_from_table(&group.params)?,
                    })
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            ScenarioPlan::grouped(&base, groups)?
        };

        Ok(Experiment { harness, plan })
    }
}

/// Build a grid from a TOML table, keeping the order of the keys in the document.
pub fn grid_from_table(table: &toml::Table) -> Result<ParameterGrid, ConfigError> {
    let mut grid = ParameterGrid::new();
    for (name, value) in table {
        grid.push(name.as_str(), candidate_values(name, value)?)?;
    }

    Ok(grid)
}

/// A scalar is a single fixed candidate, an array lists candidates and a
/// `{ start, stop, step }` table is a [ValueRange].
fn candidate_values(name: &str, value: &toml::Value) -> Result<Vec<ParamValue>, ConfigError> {
    match value {
        toml::Value::Array(items) => items.iter().map(|item| scalar(name, item)).collect(),
        toml::Value::Table(table) => range_from_table(name, table)?.expand(name),
        scalar_value => Ok(vec![scalar(name, scalar_value)?]),
    }
}

fn scalar(name: &str, value: &toml::Value) -> Result<ParamValue, ConfigError> {
    match value {
        toml::Value::Boolean(b) => Ok(ParamValue::Bool(*b)),
        toml::Value::Integer(i) => Ok(ParamValue::Int(*i)),
        toml::Value::Float(f) => Ok(ParamValue::Float(*f)),
        toml::Value::String(s) => Ok(ParamValue::Str(s.clone())),
        other => Err(ConfigError::UnsupportedValue {
            name: name.to_string(),
            kind: format!("{} is not a bool, integer, float or string", other.type_str()),
        }),
    }
}

fn range_from_table(name: &str, table: &toml::Table) -> Result<ValueRange, ConfigError> {
    let unsupported = || ConfigError::UnsupportedValue {
        name: name.to_string(),
        kind: "tables must be ranges with exactly `start`, `stop` and `step`".to_string(),
    };
    if table.len() != 3 {
        return Err(unsupported());
    }

    let bound = |key: &str| match table.get(key) {
        Some(toml::Value::Integer(i)) => Ok(RangeBound::Int(*i)),
        Some(toml::Value::Float(f)) => Ok(RangeBound::Float(*f)),
        Some(_) => Err(ConfigError::InvalidRange {
            name: name.to_string(),
            reason: format!("`{key}` must be a number"),
        }),
        None => Err(unsupported()),
    };

    Ok(ValueRange::new(bound("start")?, bound("stop")?, bound("step")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GROUPED: &str = r#"
[harness]
input = "resources/bench.jpg"
executable = "./ite"
columns = 3
tag_style = "concat"

[params]
do-gaussian = true
sigma = { start = 0.5, stop = 2.0, step = 0.5 }
sauvola-k = [0.2]

[[groups]]
name = "median-on"
[groups.params]
do-median = true
median-size = [3, 5]

[[groups]]
name = "median-off"
[groups.params]
do-median = false
"#;

    #[test]
    fn grouped_experiment_plans_union_of_groups() {
        let experiment = ExperimentFile::parse(GROUPED)
            .unwrap()
            .into_experiment()
            .unwrap();

        assert_eq!(experiment.plan.len(), 3 * 2 + 3);
        assert_eq!(experiment.harness.columns, 3);
        assert_eq!(experiment.harness.tag_style, TagStyle::Concat);
        assert_eq!(
            experiment.harness.resolved_mosaic_path(),
            PathBuf::from("test_results/comparison_grid.png")
        );
    }

    #[test]
    fn document_key_order_is_preserved() {
        let experiment = ExperimentFile::parse(GROUPED)
            .unwrap()
            .into_experiment()
            .unwrap();
        let first = experiment.plan.iter().next().unwrap();
        let names = first.scenario.iter().map(|(k, _)| k).collect::<Vec<_>>();

        assert_eq!(
            names,
            vec!["do-gaussian", "sigma", "sauvola-k", "do-median", "median-size"]
        );
    }

    #[test]
    fn flat_experiment_without_groups() {
        let experiment = ExperimentFile::parse(
            r#"
[harness]
input = "bench.jpg"

[params]
zeta = [1, 2]
alpha = ["a", "b", "c"]
"#,
        )
        .unwrap()
        .into_experiment()
        .unwrap();

        assert_eq!(experiment.plan.len(), 6);
        assert_eq!(experiment.harness, HarnessConfig::new("bench.jpg"));
        let first = experiment.plan.iter().next().unwrap();
        assert_eq!(first.scenario.iter().next().unwrap().0, "zeta");
    }

    #[test]
    fn empty_candidate_list_is_a_config_error() {
        let result = ExperimentFile::parse(
            r#"
[harness]
input = "bench.jpg"

[params]
median-size = []
"#,
        )
        .unwrap()
        .into_experiment();

        assert!(matches!(result, Err(ConfigError::EmptyParameter { .. })));
    }

    #[test]
    fn unsupported_values_are_rejected() {
        for params in [
            "when = 1979-05-27",
            "nested = [[1, 2]]",
            "table = { start = 1, stop = 2 }",
        ] {
            let content = format!("[harness]\ninput = \"bench.jpg\"\n\n[params]\n{params}\n");
            let result = ExperimentFile::parse(&content).unwrap().into_experiment();
            assert!(
                matches!(result, Err(ConfigError::UnsupportedValue { .. })),
                "expected unsupported value for `{params}`, got {result:?}"
            );
        }
    }

    #[test]
    fn zero_columns_is_rejected() {
        let result = ExperimentFile::parse(
            "[harness]\ninput = \"bench.jpg\"\ncolumns = 0\n",
        )
        .unwrap()
        .into_experiment();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting { setting: "columns", .. })
        ));
    }

    #[test]
    fn unknown_harness_keys_are_rejected() {
        assert!(ExperimentFile::parse("[harness]\ninput = \"a.jpg\"\ncolumn = 3\n").is_err());
    }

    #[test]
    fn empty_timing_flag_disables_timing_request() {
        let experiment = ExperimentFile::parse(
            "[harness]\ninput = \"bench.jpg\"\ntiming_flag = \"\"\nfixed_args = [\"--binarization\", \"otsu\"]\n",
        )
        .unwrap()
        .into_experiment()
        .unwrap();

        assert_eq!(
            experiment.harness.base_args(),
            vec!["-i", "bench.jpg", "--binarization", "otsu"]
        );
    }

    #[test]
    fn base_args_request_timing_by_default() {
        assert_eq!(
            HarnessConfig::new("bench.jpg").base_args(),
            vec!["-i", "bench.jpg", "-t"]
        );
    }
}
