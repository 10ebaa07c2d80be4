//! Configuration types for the schedule calculator.

use std::str::FromStr;

use pyo3::prelude::*;

use crate::error::ScheduleError;

/// What to do when the dependency graph contains a cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Skip the offending edge, warn, and schedule everything anyway.
    #[default]
    Degrade,
    /// Fail with `ScheduleError::CyclicDependency`.
    Reject,
}

impl FromStr for CyclePolicy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degrade" => Ok(Self::Degrade),
            "reject" => Ok(Self::Reject),
            other => Err(ScheduleError::UnknownCyclePolicy(other.to_string())),
        }
    }
}

/// Configuration for a schedule calculation.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    /// Verbosity level: 0=silent, 1=summary, 2=steps, 3=trace.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Cycle handling: "degrade" or "reject"
    #[pyo3(get, set)]
    pub cycle_policy: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            cycle_policy: "degrade".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn cycle_policy(&self) -> Result<CyclePolicy, ScheduleError> {
        self.cycle_policy.parse()
    }
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, cycle_policy=None))]
    fn new(verbosity: Option<u8>, cycle_policy: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            cycle_policy: cycle_policy.unwrap_or(defaults.cycle_policy),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(verbosity={}, cycle_policy={:?})",
            self.verbosity, self.cycle_policy
        )
    }
}
