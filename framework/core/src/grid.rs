use crate::error::ConfigError;
use crate::value::ParamValue;

/// A named parameter with its ordered candidate values.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The tool flag name, without the leading `--`.
    pub name: String,
    pub values: Vec<ParamValue>,
}

/// An ordered mapping from parameter name to candidate values.
///
/// The order that parameters are added in is the order that they appear in generated command
/// lines and tags. It is also the iteration order of the cartesian product: the first parameter
/// varies slowest and the last parameter varies fastest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGrid {
    params: Vec<Parameter>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the end of the grid.
    ///
    /// Fails if the name is not usable as a flag or is already present. An empty candidate list
    /// is accepted here and reported by [ParameterGrid::validate].
    pub fn with_param(
        mut self,
        name: impl Into<String>,
        values: Vec<ParamValue>,
    ) -> Result<Self, ConfigError> {
        self.push(name, values)?;
        Ok(self)
    }

    /// See [ParameterGrid::with_param].
    pub fn push(
        &mut self,
        name: impl Into<String>,
        values: Vec<ParamValue>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        validate_name(&name)?;
        if self.get(&name).is_some() {
            return Err(ConfigError::DuplicateParameter { name });
        }

        self.params.push(Parameter { name, values });
        Ok(())
    }

    /// Combine a shared base grid with a group specific grid.
    ///
    /// Parameters from `group` replace a base parameter of the same name in place, all other
    /// group parameters are appended after the base parameters in their own order.
    pub fn merged(base: &ParameterGrid, group: &ParameterGrid) -> ParameterGrid {
        let mut params = base.params.clone();
        for param in &group.params {
            match params.iter_mut().find(|p| p.name == param.name) {
                Some(existing) => existing.values = param.values.clone(),
                None => params.push(param.clone()),
            }
        }

        ParameterGrid { params }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// The number of parameters, not the number of scenarios.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Check that every parameter has at least one candidate value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.params.iter().find(|p| p.values.is_empty()) {
            Some(p) => Err(ConfigError::EmptyParameter {
                name: p.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The number of scenarios in the cartesian product of this grid.
    ///
    /// A grid without parameters has exactly one, empty, scenario.
    pub fn scenario_count(&self) -> Result<usize, ConfigError> {
        self.params.iter().try_fold(1usize, |acc, p| {
            acc.checked_mul(p.values.len())
                .ok_or(ConfigError::TooManyScenarios)
        })
    }

    /// Resolve the scenario at `index` in product order without enumerating the ones before it.
    ///
    /// The index is decomposed as a mixed radix number with the last parameter as the least
    /// significant digit.
    pub fn scenario_at(&self, index: usize) -> Option<Scenario> {
        if index >= self.scenario_count().ok()? {
            return None;
        }

        let mut remainder = index;
        let mut picks = vec![0; self.params.len()];
        for (slot, param) in picks.iter_mut().zip(&self.params).rev() {
            let radix = param.values.len();
            *slot = remainder % radix;
            remainder /= radix;
        }

        Some(self.pick(&picks))
    }

    /// Lazily iterate the cartesian product of this grid.
    ///
    /// The iterator is finite and cheap to create, so the product can be walked again by calling
    /// this method again.
    pub fn scenarios(&self) -> ScenarioIter<'_> {
        ScenarioIter::new(self)
    }

    fn pick(&self, picks: &[usize]) -> Scenario {
        self.params
            .iter()
            .zip(picks)
            .map(|(param, &i)| (param.name.clone(), param.values[i].clone()))
            .collect()
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.starts_with('-') {
        Some("name must not include the leading dashes")
    } else if name.chars().any(char::is_whitespace) {
        Some("name must not contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidParameterName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// One fully resolved assignment of a value to each parameter of a grid.
///
/// Scenarios describe themselves as ordered pairs so that scenarios from different groups can
/// carry different parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pairs: Vec<(String, ParamValue)>,
}

impl Scenario {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for Scenario {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Odometer over the cartesian product of a [ParameterGrid].
#[derive(Debug, Clone)]
pub struct ScenarioIter<'a> {
    grid: &'a ParameterGrid,
    picks: Vec<usize>,
    remaining: usize,
}

impl<'a> ScenarioIter<'a> {
    fn new(grid: &'a ParameterGrid) -> Self {
        Self {
            grid,
            picks: vec![0; grid.params.len()],
            // Overflowing grids are rejected when a plan is built.
            remaining: grid.scenario_count().unwrap_or(usize::MAX),
        }
    }

    fn advance(&mut self) {
        for (slot, param) in self.picks.iter_mut().zip(&self.grid.params).rev() {
            *slot += 1;
            if *slot < param.values.len() {
                return;
            }
            *slot = 0;
        }
    }
}

impl Iterator for ScenarioIter<'_> {
    type Item = Scenario;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let scenario = self.grid.pick(&self.picks);
        self.remaining -= 1;
        self.advance();

        Some(scenario)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ScenarioIter<'_> {}
