use crate::error::ConfigError;
use crate::grid::{ParameterGrid, Scenario, ScenarioIter};

/// A named grid whose cartesian product is one slice of a [ScenarioPlan].
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioGroup {
    pub name: String,
    pub grid: ParameterGrid,
}

/// A scenario together with its position in the overall run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedScenario<'a> {
    /// Zero based index across all groups.
    pub index: usize,
    /// Name of the group that produced this scenario.
    pub group: &'a str,
    pub scenario: Scenario,
}

/// The ordered list of scenarios to run.
///
/// A plan is either the product of a single grid or the concatenation of the products of
/// several groups. Groups are never combined with each other.
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    groups: Vec<ScenarioGroup>,
    total: usize,
}

impl ScenarioPlan {
    /// Plan the full cartesian product of one grid.
    pub fn flat(grid: ParameterGrid) -> Result<Self, ConfigError> {
        Self::from_groups(vec![ScenarioGroup {
            name: "default".to_string(),
            grid,
        }])
    }

    /// Plan the union of several groups that share a base grid.
    ///
    /// Each group's grid is merged with `base` using [ParameterGrid::merged]. Scenarios are
    /// produced group by group in the order given.
    pub fn grouped(
        base: &ParameterGrid,
        groups: impl IntoIterator<Item = ScenarioGroup>,
    ) -> Result<Self, ConfigError> {
        Self::from_groups(
            groups
                .into_iter()
                .map(|group| ScenarioGroup {
                    grid: ParameterGrid::merged(base, &group.grid),
                    name: group.name,
                })
                .collect(),
        )
    }

    fn from_groups(groups: Vec<ScenarioGroup>) -> Result<Self, ConfigError> {
        if groups.is_empty() {
            return Err(ConfigError::NoScenarios);
        }

        let mut total = 0usize;
        for group in &groups {
            group.grid.validate()?;
            let count = group.grid.scenario_count()?;
            log::debug!("Group [{}] expands to {} scenarios", group.name, count);
            total = total
                .checked_add(count)
                .ok_or(ConfigError::TooManyScenarios)?;
        }

        Ok(Self { groups, total })
    }

    /// Total number of scenarios across all groups.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn groups(&self) -> &[ScenarioGroup] {
        &self.groups
    }

    /// Lazily iterate every scenario of the plan in run order.
    pub fn iter(&self) -> PlanIter<'_> {
        PlanIter {
            groups: self.groups.iter(),
            current: None,
            next_index: 0,
            remaining: self.total,
        }
    }
}

impl<'a> IntoIterator for &'a ScenarioPlan {
    type Item = PlannedScenario<'a>;
    type IntoIter = PlanIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the scenarios of a [ScenarioPlan], see [ScenarioPlan::iter].
#[derive(Debug, Clone)]
pub struct PlanIter<'a> {
    groups: std::slice::Iter<'a, ScenarioGroup>,
    current: Option<(&'a str, ScenarioIter<'a>)>,
    next_index: usize,
    remaining: usize,
}

impl<'a> Iterator for PlanIter<'a> {
    type Item = PlannedScenario<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((group, scenarios)) = &mut self.current {
                if let Some(scenario) = scenarios.next() {
                    let planned = PlannedScenario {
                        index: self.next_index,
                        group: *group,
                        scenario,
                    };
                    self.next_index += 1;
                    self.remaining -= 1;
                    return Some(planned);
                }
            }

            let group = self.groups.next()?;
            self.current = Some((group.name.as_str(), group.grid.scenarios()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PlanIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::{Invocation, TagStyle};
    use crate::value::ParamValue;
    use pretty_assertions::assert_eq;

    fn base() -> ParameterGrid {
        ParameterGrid::new()
            .with_param("do-gaussian", vec![true.into()])
            .unwrap()
            .with_param("sigma", vec![1.0.into(), 2.0.into()])
            .unwrap()
    }

    fn median_groups() -> Vec<ScenarioGroup> {
        vec![
            ScenarioGroup {
                name: "median-on".to_string(),
                grid: ParameterGrid::new()
                    .with_param("do-median", vec![true.into()])
                    .unwrap()
                    .with_param("median-size", vec![3.into(), 5.into(), 7.into()])
                    .unwrap(),
            },
            ScenarioGroup {
                name: "median-off".to_string(),
                grid: ParameterGrid::new()
                    .with_param("do-median", vec![false.into()])
                    .unwrap(),
            },
        ]
    }

    #[test]
    fn grouped_count_is_sum_of_group_products() {
        let plan = ScenarioPlan::grouped(&base(), median_groups()).unwrap();
        assert_eq!(plan.len(), 2 * 3 + 2);
        assert_eq!(plan.iter().len(), 8);
        assert_eq!(plan.iter().count(), 8);
    }

    #[test]
    fn groups_are_concatenated_in_order() {
        let plan = ScenarioPlan::grouped(&base(), median_groups()).unwrap();
        let groups = plan.iter().map(|p| p.group).collect::<Vec<_>>();
        assert_eq!(
            groups,
            vec![
                "median-on",
                "median-on",
                "median-on",
                "median-on",
                "median-on",
                "median-on",
                "median-off",
                "median-off"
            ]
        );

        let indices = plan.iter().map(|p| p.index).collect::<Vec<_>>();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn groups_keep_their_own_key_sets() {
        let plan = ScenarioPlan::grouped(&base(), median_groups()).unwrap();
        let scenarios = plan.iter().map(|p| p.scenario).collect::<Vec<_>>();

        assert_eq!(scenarios[0].len(), 4);
        assert_eq!(scenarios[0].get("median-size"), Some(&ParamValue::Int(3)));
        assert_eq!(scenarios[7].len(), 3);
        assert_eq!(scenarios[7].get("median-size"), None);
        assert_eq!(scenarios[7].get("do-median"), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn flat_plan_is_a_single_product() {
        let plan = ScenarioPlan::flat(base()).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.groups().len(), 1);
    }

    #[test]
    fn empty_candidate_list_aborts_planning() {
        let groups = vec![ScenarioGroup {
            name: "broken".to_string(),
            grid: ParameterGrid::new().with_param("median-size", vec![]).unwrap(),
        }];
        assert!(matches!(
            ScenarioPlan::grouped(&base(), groups),
            Err(ConfigError::EmptyParameter { name }) if name == "median-size"
        ));
    }

    #[test]
    fn plan_without_groups_is_rejected() {
        assert!(matches!(
            ScenarioPlan::grouped(&base(), vec![]),
            Err(ConfigError::NoScenarios)
        ));
    }

    #[test]
    fn disabled_median_group_is_named_by_index_only() {
        let groups = vec![
            ScenarioGroup {
                name: "median-on".to_string(),
                grid: ParameterGrid::new()
                    .with_param("do-median", vec![true.into()])
                    .unwrap()
                    .with_param("median-size", vec![3.into(), 5.into()])
                    .unwrap(),
            },
            ScenarioGroup {
                name: "median-off".to_string(),
                grid: ParameterGrid::new()
                    .with_param("do-median", vec![false.into()])
                    .unwrap(),
            },
        ];
        let plan = ScenarioPlan::grouped(&ParameterGrid::new(), groups).unwrap();

        let named = plan
            .iter()
            .map(|planned| {
                let invocation = Invocation::build(&[], &planned.scenario, TagStyle::Colon);
                (invocation.file_name(planned.index), invocation.label())
            })
            .collect::<Vec<_>>();

        assert_eq!(
            named,
            vec![
                (
                    "out_000_do-median_median-size:3.png".to_string(),
                    "do-median\nmedian-size:3".to_string()
                ),
                (
                    "out_001_do-median_median-size:5.png".to_string(),
                    "do-median\nmedian-size:5".to_string()
                ),
                ("out_002_.png".to_string(), String::new()),
            ]
        );
    }
}
