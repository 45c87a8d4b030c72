use itertools::Itertools;

use crate::grid::Scenario;
use crate::value::ParamValue;

/// How a valued parameter is rendered as a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagStyle {
    /// `median-size:3`
    #[default]
    Colon,
    /// `median-size3`
    Concat,
}

impl TagStyle {
    fn tag(self, name: &str, value: &ParamValue) -> String {
        match self {
            TagStyle::Colon => format!("{name}:{value}"),
            TagStyle::Concat => format!("{name}{value}"),
        }
    }
}

/// The command line arguments and descriptive tags for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Arguments to pass to the tool, excluding the executable and the output flag.
    pub args: Vec<String>,
    /// One tag per parameter that contributed to `args`, in scenario order.
    pub tags: Vec<String>,
}

impl Invocation {
    /// Build the invocation for `scenario`, appending its flags after `base_args`.
    ///
    /// `true` becomes a bare `--name` flag and a `name` tag, `false` contributes nothing, and
    /// every other value becomes `--name value` with a tag rendered by `style`.
    pub fn build(base_args: &[String], scenario: &Scenario, style: TagStyle) -> Self {
        let mut args = base_args.to_vec();
        let mut tags = Vec::with_capacity(scenario.len());

        for (name, value) in scenario.iter() {
            match value {
                ParamValue::Bool(true) => {
                    args.push(format!("--{name}"));
                    tags.push(name.to_string());
                }
                ParamValue::Bool(false) => {}
                value => {
                    args.push(format!("--{name}"));
                    args.push(value.token());
                    tags.push(style.tag(name, value));
                }
            }
        }

        Self { args, tags }
    }

    /// The display label, one tag per line.
    pub fn label(&self) -> String {
        self.tags.join("\n")
    }

    /// The output file name for this invocation at position `index` of the run.
    ///
    /// The index is zero padded to at least three digits and keeps names unique even when two
    /// scenarios have the same tags. Path separators inside tags are replaced with `-`.
    pub fn file_name(&self, index: usize) -> String {
        let tags = self
            .tags
            .iter()
            .map(|tag| tag.replace(['/', '\\'], "-"))
            .join("_");

        format!("out_{index:03}_{tags}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ParameterGrid;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn base_args() -> Vec<String> {
        vec!["-i".to_string(), "bench.jpg".to_string(), "-t".to_string()]
    }

    fn median_grid() -> ParameterGrid {
        ParameterGrid::new()
            .with_param("do-median", vec![true.into(), false.into()])
            .unwrap()
            .with_param("median-size", vec![3.into(), 5.into()])
            .unwrap()
    }

    #[test]
    fn true_flags_are_bare_and_false_flags_are_dropped() {
        let invocations = median_grid()
            .scenarios()
            .map(|s| Invocation::build(&[], &s, TagStyle::Colon))
            .collect::<Vec<_>>();

        assert_eq!(invocations[0].args, vec!["--do-median", "--median-size", "3"]);
        assert_eq!(invocations[0].tags, vec!["do-median", "median-size:3"]);
        assert_eq!(invocations[1].args, vec!["--do-median", "--median-size", "5"]);
        assert_eq!(
            invocations[1].file_name(1),
            "out_001_do-median_median-size:5.png"
        );
        assert_eq!(invocations[2].args, vec!["--median-size", "3"]);
        assert_eq!(invocations[2].tags, vec!["median-size:3"]);
    }

    #[test]
    fn disabled_toggle_without_other_parameters_has_no_tags() {
        let grid = ParameterGrid::new()
            .with_param("do-median", vec![false.into()])
            .unwrap();
        let scenario = grid.scenarios().next().unwrap();
        let invocation = Invocation::build(&base_args(), &scenario, TagStyle::Colon);

        assert_eq!(invocation.args, base_args());
        assert!(invocation.tags.is_empty());
        assert_eq!(invocation.label(), "");
        assert_eq!(invocation.file_name(7), "out_007_.png");
    }

    #[test]
    fn argument_count_matches_parameter_kinds() {
        let grid = ParameterGrid::new()
            .with_param("do-gaussian", vec![true.into(), false.into()])
            .unwrap()
            .with_param("sigma", vec![0.5.into(), 1.0.into()])
            .unwrap()
            .with_param("do-despeckle", vec![true.into(), false.into()])
            .unwrap()
            .with_param("binarization", vec!["sauvola".into()])
            .unwrap();

        for scenario in grid.scenarios() {
            let trues = scenario
                .iter()
                .filter(|(_, v)| v.as_bool() == Some(true))
                .count();
            let valued = scenario.iter().filter(|(_, v)| v.as_bool().is_none()).count();
            let invocation = Invocation::build(&base_args(), &scenario, TagStyle::Colon);

            assert_eq!(
                invocation.args.len() - base_args().len(),
                trues + 2 * valued
            );
        }
    }

    #[test]
    fn concat_style_joins_name_and_value() {
        let grid = ParameterGrid::new()
            .with_param("sigma", vec![1.5.into()])
            .unwrap()
            .with_param("sauvola-window", vec![15.into()])
            .unwrap();
        let scenario = grid.scenarios().next().unwrap();
        let invocation = Invocation::build(&[], &scenario, TagStyle::Concat);

        assert_eq!(invocation.tags, vec!["sigma1.5", "sauvola-window15"]);
        assert_eq!(invocation.label(), "sigma1.5\nsauvola-window15");
    }

    #[test]
    fn file_names_are_unique_even_with_identical_tags() {
        let grid = ParameterGrid::new()
            .with_param("do-median", vec![false.into(), false.into(), false.into()])
            .unwrap();
        let names = grid
            .scenarios()
            .enumerate()
            .map(|(i, s)| Invocation::build(&[], &s, TagStyle::Colon).file_name(i))
            .collect::<HashSet<_>>();

        assert_eq!(names.len(), 3);
    }

    #[test]
    fn naming_is_deterministic() {
        let render = || {
            median_grid()
                .scenarios()
                .enumerate()
                .map(|(i, s)| {
                    let invocation = Invocation::build(&base_args(), &s, TagStyle::Colon);
                    (invocation.file_name(i), invocation.label())
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn path_separators_are_removed_from_file_names_only() {
        let grid = ParameterGrid::new()
            .with_param("profile", vec!["a/b".into()])
            .unwrap();
        let scenario = grid.scenarios().next().unwrap();
        let invocation = Invocation::build(&[], &scenario, TagStyle::Colon);

        assert_eq!(invocation.file_name(0), "out_000_profile:a-b.png");
        assert_eq!(invocation.label(), "profile:a/b");
    }

    #[test]
    fn index_is_padded_to_three_digits_and_then_grows() {
        let values = (0..1001).map(ParamValue::Int).collect::<Vec<_>>();
        let grid = ParameterGrid::new().with_param("n", values).unwrap();
        let names = grid
            .scenarios()
            .enumerate()
            .map(|(i, s)| Invocation::build(&[], &s, TagStyle::Colon).file_name(i))
            .collect::<Vec<_>>();

        assert_eq!(names[0], "out_000_n:0.png");
        assert_eq!(names[999], "out_999_n:999.png");
        assert_eq!(names[1000], "out_1000_n:1000.png");
    }
}
