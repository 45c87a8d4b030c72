mod error;
mod grid;
mod invocation;
mod plan;
mod range;
mod value;

pub mod prelude {
    pub use crate::error::ConfigError;
    pub use crate::grid::{Parameter, ParameterGrid, Scenario, ScenarioIter};
    pub use crate::invocation::{Invocation, TagStyle};
    pub use crate::plan::{PlanIter, PlannedScenario, ScenarioGroup, ScenarioPlan};
    pub use crate::range::{RangeBound, ValueRange, MAX_RANGE_VALUES};
    pub use crate::value::ParamValue;
}
