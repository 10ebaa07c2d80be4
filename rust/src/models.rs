//! Core data types: the work-breakdown template going in, the schedule coming out.

use std::str::FromStr;

use chrono::NaiveDate;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Precedence relation between a predecessor and a successor task.
///
/// Serialized as its short code. Deserialization goes through
/// `from_code_or_default`, so unknown codes load as finish-to-start.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum DependencyType {
    /// Successor starts after the predecessor finishes.
    #[serde(rename = "FS")]
    FinishToStart,
    /// Successor starts after the predecessor starts.
    #[serde(rename = "SS")]
    StartToStart,
    /// Successor finishes after the predecessor finishes.
    #[serde(rename = "FF")]
    FinishToFinish,
    /// Successor finishes after the predecessor starts.
    #[serde(rename = "SF")]
    StartToFinish,
}

impl From<String> for DependencyType {
    fn from(code: String) -> Self {
        Self::from_code_or_default(&code)
    }
}

impl Default for DependencyType {
    fn default() -> Self {
        Self::FinishToStart
    }
}

impl DependencyType {
    /// Short code used in templates and exports.
    pub fn code(self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }

    /// Parse a type code, treating anything unrecognised as finish-to-start.
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for DependencyType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "fs" | "finish_to_start" => Ok(Self::FinishToStart),
            "ss" | "start_to_start" => Ok(Self::StartToStart),
            "ff" | "finish_to_finish" => Ok(Self::FinishToFinish),
            "sf" | "start_to_finish" => Ok(Self::StartToFinish),
            _ => Err(ScheduleError::UnknownDependencyType(s.to_string())),
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[pymethods]
impl DependencyType {
    fn __str__(&self) -> &'static str {
        self.code()
    }
}

/// A directed precedence edge between two tasks of the same template.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[pyo3(get, set)]
    pub predecessor_task_id: String,
    #[pyo3(get, set)]
    pub successor_task_id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub dependency_type: DependencyType,
    /// Positive delays the successor, negative lets it overlap (lead).
    #[pyo3(get, set)]
    #[serde(default)]
    pub lag_days: i32,
}

#[pymethods]
impl Dependency {
    #[new]
    #[pyo3(signature = (predecessor_task_id, successor_task_id, dependency_type="FS", lag_days=0))]
    fn new(
        predecessor_task_id: String,
        successor_task_id: String,
        dependency_type: &str,
        lag_days: i32,
    ) -> Self {
        Self {
            predecessor_task_id,
            successor_task_id,
            dependency_type: DependencyType::from_code_or_default(dependency_type),
            lag_days,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependency({:?} -[{} {:+}]-> {:?})",
            self.predecessor_task_id, self.dependency_type, self.lag_days, self.successor_task_id
        )
    }
}

/// Leaf of the work breakdown: the only level that carries a duration.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub wbs_code: String,
    #[pyo3(get, set)]
    pub estimated_duration_days: u32,
    #[pyo3(get, set)]
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, name, estimated_duration_days, wbs_code=String::new(), estimated_cost=None))]
    fn new(
        id: String,
        name: String,
        estimated_duration_days: u32,
        wbs_code: String,
        estimated_cost: Option<f64>,
    ) -> Self {
        Self {
            id,
            name,
            wbs_code,
            estimated_duration_days,
            estimated_cost,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, wbs_code={:?}, duration_days={})",
            self.id, self.wbs_code, self.estimated_duration_days
        )
    }
}

/// Work package: groups tasks, its span is always derived from them.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub wbs_code: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

#[pymethods]
impl Package {
    #[new]
    #[pyo3(signature = (id, name, tasks=Vec::new(), wbs_code=String::new(), estimated_cost=None))]
    fn new(
        id: String,
        name: String,
        tasks: Vec<Task>,
        wbs_code: String,
        estimated_cost: Option<f64>,
    ) -> Self {
        Self {
            id,
            name,
            wbs_code,
            tasks,
            estimated_cost,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Package(id={:?}, wbs_code={:?}, tasks={})",
            self.id,
            self.wbs_code,
            self.tasks.len()
        )
    }
}

/// Top level of the work breakdown.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub wbs_code: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub packages: Vec<Package>,
}

#[pymethods]
impl Phase {
    #[new]
    #[pyo3(signature = (id, name, packages=Vec::new(), wbs_code=String::new()))]
    fn new(id: String, name: String, packages: Vec<Package>, wbs_code: String) -> Self {
        Self {
            id,
            name,
            wbs_code,
            packages,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Phase(id={:?}, wbs_code={:?}, packages={})",
            self.id,
            self.wbs_code,
            self.packages.len()
        )
    }
}

/// A project template: the phase tree plus every dependency edge between its tasks.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkBreakdownTemplate {
    #[pyo3(get, set)]
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl WorkBreakdownTemplate {
    /// Every task with its owning package and phase ids, in document order.
    pub fn iter_tasks(&self) -> impl Iterator<Item = (&Phase, &Package, &Task)> {
        self.phases.iter().flat_map(|phase| {
            phase.packages.iter().flat_map(move |package| {
                package.tasks.iter().map(move |task| (phase, package, task))
            })
        })
    }
}

#[pymethods]
impl WorkBreakdownTemplate {
    #[new]
    #[pyo3(signature = (phases=Vec::new(), dependencies=Vec::new()))]
    fn new(phases: Vec<Phase>, dependencies: Vec<Dependency>) -> Self {
        Self {
            phases,
            dependencies,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "WorkBreakdownTemplate(phases={}, tasks={}, dependencies={})",
            self.phases.len(),
            self.iter_tasks().count(),
            self.dependencies.len()
        )
    }
}

/// A task with its computed dates.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub wbs_code: String,
    #[pyo3(get)]
    pub package_id: String,
    #[pyo3(get)]
    pub phase_id: String,
    #[pyo3(get)]
    pub start: NaiveDate,
    #[pyo3(get)]
    pub end: NaiveDate,
    #[pyo3(get)]
    pub duration: i64,
    #[pyo3(get)]
    pub is_critical: bool,
    /// Days between this task's end and the project end.
    #[pyo3(get)]
    pub slack_days: i64,
    #[pyo3(get)]
    pub estimated_cost: Option<f64>,
}

#[pymethods]
impl ScheduledTask {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(id={:?}, start={}, end={}, critical={})",
            self.id, self.start, self.end, self.is_critical
        )
    }
}

/// A work package with the span of its tasks.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPackage {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub wbs_code: String,
    #[pyo3(get)]
    pub start: NaiveDate,
    #[pyo3(get)]
    pub end: NaiveDate,
    #[pyo3(get)]
    pub duration: i64,
    #[pyo3(get)]
    pub tasks: Vec<ScheduledTask>,
    #[pyo3(get)]
    pub estimated_cost: Option<f64>,
}

#[pymethods]
impl ScheduledPackage {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledPackage(id={:?}, start={}, end={}, tasks={})",
            self.id,
            self.start,
            self.end,
            self.tasks.len()
        )
    }
}

/// A phase with the span of its packages.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPhase {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub wbs_code: String,
    #[pyo3(get)]
    pub start: NaiveDate,
    #[pyo3(get)]
    pub end: NaiveDate,
    #[pyo3(get)]
    pub duration: i64,
    #[pyo3(get)]
    pub packages: Vec<ScheduledPackage>,
}

#[pymethods]
impl ScheduledPhase {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledPhase(id={:?}, start={}, end={}, packages={})",
            self.id,
            self.start,
            self.end,
            self.packages.len()
        )
    }
}

/// A dependency edge that was skipped because following it would re-enter a
/// task whose ordering was still in progress.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleBreak {
    /// The task that was already on the traversal path.
    #[pyo3(get)]
    pub task_id: String,
    /// The task whose predecessor edge pointed back at it.
    #[pyo3(get)]
    pub successor_id: String,
}

#[pymethods]
impl CycleBreak {
    fn __repr__(&self) -> String {
        format!(
            "CycleBreak(task_id={:?}, successor_id={:?})",
            self.task_id, self.successor_id
        )
    }
}

/// Output of the schedule calculator.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    #[pyo3(get)]
    pub phases: Vec<ScheduledPhase>,
    /// Every task once, in document order.
    #[pyo3(get)]
    pub tasks: Vec<ScheduledTask>,
    #[pyo3(get)]
    pub total_days: i64,
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    #[pyo3(get)]
    pub start_date: NaiveDate,
    #[pyo3(get)]
    pub end_date: NaiveDate,
    #[pyo3(get)]
    pub cycle_breaks: Vec<CycleBreak>,
}

impl ScheduleResult {
    /// Look up a scheduled task by id.
    pub fn task(&self, id: &str) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[pymethods]
impl ScheduleResult {
    /// Whether the dependency graph contained at least one cycle.
    pub fn has_cycles(&self) -> bool {
        !self.cycle_breaks.is_empty()
    }

    #[pyo3(name = "task")]
    fn py_task(&self, id: &str) -> Option<ScheduledTask> {
        self.task(id).cloned()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(start={}, end={}, total_days={}, tasks={}, critical={})",
            self.start_date,
            self.end_date,
            self.total_days,
            self.tasks.len(),
            self.critical_path.len()
        )
    }
}
