//! Structural checks for templates before they are scheduled.
//!
//! The calculator tolerates all of these; this report exists so authoring tools
//! can tell users why a schedule looks wrong.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::graph::{topological_order, PredecessorIndex};
use crate::models::WorkBreakdownTemplate;

/// A problem found in a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    #[error("Task id {0} is used more than once")]
    DuplicateTaskId(String),
    #[error("Dependency {predecessor_id} -> {successor_id} references a task that does not exist")]
    DanglingDependency {
        predecessor_id: String,
        successor_id: String,
    },
    #[error("Task {0} depends on itself")]
    SelfDependency(String),
    #[error("Dependency cycle: {task_id} is reachable from its successor {successor_id}")]
    Cycle {
        task_id: String,
        successor_id: String,
    },
}

/// Report every structural problem in `template`, in a stable order:
/// duplicates, dangling edges, self-dependencies, then cycles.
pub fn validate_template(template: &WorkBreakdownTemplate) -> Vec<TemplateIssue> {
    let mut issues = Vec::new();

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut reported: FxHashSet<&str> = FxHashSet::default();
    let mut task_ids: Vec<&str> = Vec::new();
    for (_, _, task) in template.iter_tasks() {
        let id = task.id.as_str();
        if seen.insert(id) {
            task_ids.push(id);
        } else if reported.insert(id) {
            issues.push(TemplateIssue::DuplicateTaskId(id.to_string()));
        }
    }

    for dep in &template.dependencies {
        let pred = dep.predecessor_task_id.as_str();
        let succ = dep.successor_task_id.as_str();
        if !seen.contains(pred) || !seen.contains(succ) {
            issues.push(TemplateIssue::DanglingDependency {
                predecessor_id: pred.to_string(),
                successor_id: succ.to_string(),
            });
        }
    }

    for dep in &template.dependencies {
        let id = dep.successor_task_id.as_str();
        if dep.predecessor_task_id == id && seen.contains(id) {
            issues.push(TemplateIssue::SelfDependency(id.to_string()));
        }
    }

    let index = PredecessorIndex::build(&template.dependencies);
    let topo = topological_order(&task_ids, &index);
    issues.extend(
        topo.cycle_breaks
            .into_iter()
            .filter(|b| b.task_id != b.successor_id)
            .map(|b| TemplateIssue::Cycle {
                task_id: b.task_id,
                successor_id: b.successor_id,
            }),
    );

    issues
}
