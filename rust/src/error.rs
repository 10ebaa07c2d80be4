//! Error type shared by the calculator and its helpers.

use thiserror::Error;

/// Errors surfaced by the opt-in strict paths of the crate.
///
/// The default calculator never fails: these only come out of strict parsing
/// and the `"reject"` cycle policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Circular dependency detected: task {task_id} is reachable from its successor {successor_id}")]
    CyclicDependency {
        task_id: String,
        successor_id: String,
    },
    #[error("Unknown dependency type: {0}")]
    UnknownDependencyType(String),
    #[error("Unknown cycle policy: {0}")]
    UnknownCyclePolicy(String),
    #[error("Unknown duration locale: {0}")]
    UnknownLocale(String),
}
