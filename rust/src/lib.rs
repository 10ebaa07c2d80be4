//! Template scheduling engine for renovation projects.
//!
//! Takes a work-breakdown template (phases -> work packages -> tasks) plus the
//! precedence dependencies between its tasks, and computes a forward-pass
//! schedule with package/phase rollups and a critical path. Also exposed to
//! Python as the `wbs_schedule` extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;

pub mod logging;

mod config;
mod cost;
mod dates;
mod error;
mod format;
pub mod graph;
mod models;
mod schedule;
mod validation;

pub use config::{CyclePolicy, ScheduleConfig};
pub use cost::{phase_costs, total_cost};
pub use dates::{add_days, days_between, today};
pub use error::ScheduleError;
pub use format::{format_duration, format_duration_in, DurationLocale};
pub use models::{
    CycleBreak, Dependency, DependencyType, Package, Phase, ScheduleResult, ScheduledPackage,
    ScheduledPhase, ScheduledTask, Task, WorkBreakdownTemplate,
};
pub use schedule::{calculate_schedule, calculate_schedule_with_config};
pub use validation::{validate_template, TemplateIssue};

/// Compute the schedule of a template.
///
/// # Arguments
/// * `template` - Phases, packages, tasks and their dependencies
/// * `start_date` - Earliest start for any task (defaults to today)
/// * `config` - Verbosity and cycle policy (defaults to "degrade")
///
/// # Raises
/// * ValueError if the cycle policy is unknown, or is "reject" and the
///   dependencies contain a cycle
#[pyfunction]
#[pyo3(name = "calculate_schedule", signature = (template, start_date=None, config=None))]
fn py_calculate_schedule(
    template: WorkBreakdownTemplate,
    start_date: Option<NaiveDate>,
    config: Option<ScheduleConfig>,
) -> PyResult<ScheduleResult> {
    let config = config.unwrap_or_default();
    calculate_schedule_with_config(&template, start_date, &config)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Sum of all package and task cost estimates in a template.
#[pyfunction]
#[pyo3(name = "total_cost")]
fn py_total_cost(template: WorkBreakdownTemplate) -> f64 {
    total_cost(&template)
}

/// Format a day count for display ("de" or "en").
#[pyfunction]
#[pyo3(name = "format_duration", signature = (days, locale="de"))]
fn py_format_duration(days: i64, locale: &str) -> PyResult<String> {
    let locale: DurationLocale = locale
        .parse()
        .map_err(|e: ScheduleError| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    Ok(format_duration_in(days, locale))
}

/// Structural problems in a template, as human-readable messages.
#[pyfunction]
#[pyo3(name = "validate_template")]
fn py_validate_template(template: WorkBreakdownTemplate) -> Vec<String> {
    validate_template(&template)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// The wbs_schedule Python module.
#[pymodule]
fn wbs_schedule(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Template types
    m.add_class::<DependencyType>()?;
    m.add_class::<Dependency>()?;
    m.add_class::<Task>()?;
    m.add_class::<Package>()?;
    m.add_class::<Phase>()?;
    m.add_class::<WorkBreakdownTemplate>()?;

    // Result types
    m.add_class::<ScheduledTask>()?;
    m.add_class::<ScheduledPackage>()?;
    m.add_class::<ScheduledPhase>()?;
    m.add_class::<CycleBreak>()?;
    m.add_class::<ScheduleResult>()?;

    m.add_class::<ScheduleConfig>()?;

    m.add_function(wrap_pyfunction!(py_calculate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_total_cost, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_duration, m)?)?;
    m.add_function(wrap_pyfunction!(py_validate_template, m)?)?;

    Ok(())
}
