//! Forward-pass schedule calculation over a work-breakdown template.
//!
//! The calculation:
//! 1. Indexes dependency edges by successor
//! 2. Collects every task with a placeholder span at the start date
//! 3. Orders tasks so predecessors come first (cycles are broken, not fatal)
//! 4. Places each task at the latest date its predecessor edges allow
//! 5. Flags tasks that finish on the project end date as critical
//! 6. Rolls task spans up into packages and phases

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::config::{CyclePolicy, ScheduleConfig};
use crate::dates::{add_days, days_between, today};
use crate::error::ScheduleError;
use crate::graph::{topological_order, PredecessorIndex};
use crate::models::{
    DependencyType, Package, Phase, ScheduleResult, ScheduledPackage, ScheduledPhase,
    ScheduledTask, Task, WorkBreakdownTemplate,
};
use crate::{log_steps, log_summary, log_trace};

/// Working span of one task during the forward pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TaskSpan {
    start: NaiveDate,
    end: NaiveDate,
    duration: i64,
}

impl TaskSpan {
    fn at(start: NaiveDate, duration: i64) -> Self {
        Self {
            start,
            end: add_days(start, duration),
            duration,
        }
    }
}

/// A task together with the package and phase that own it.
#[derive(Clone, Copy)]
struct TaskEntry<'a> {
    phase: &'a Phase,
    package: &'a Package,
    task: &'a Task,
}

/// Calculate a schedule with the default configuration.
///
/// Never fails: a dependency cycle is broken, reported through
/// `ScheduleResult::cycle_breaks` and a `tracing` warning, and scheduling
/// carries on. `start_date` defaults to today.
pub fn calculate_schedule(
    template: &WorkBreakdownTemplate,
    start_date: Option<NaiveDate>,
) -> ScheduleResult {
    let start = start_date.unwrap_or_else(today);
    run(template, start, ScheduleConfig::default().verbosity)
}

/// Calculate a schedule, honouring the configured cycle policy.
///
/// # Returns
/// * `Ok(ScheduleResult)` on success
/// * `Err(ScheduleError::UnknownCyclePolicy)` if the policy string is invalid
/// * `Err(ScheduleError::CyclicDependency)` under the `"reject"` policy when the
///   dependency graph has a cycle
pub fn calculate_schedule_with_config(
    template: &WorkBreakdownTemplate,
    start_date: Option<NaiveDate>,
    config: &ScheduleConfig,
) -> Result<ScheduleResult, ScheduleError> {
    let policy = config.cycle_policy()?;
    let start = start_date.unwrap_or_else(today);
    let result = run(template, start, config.verbosity);

    if policy == CyclePolicy::Reject {
        if let Some(first) = result.cycle_breaks.first() {
            return Err(ScheduleError::CyclicDependency {
                task_id: first.task_id.clone(),
                successor_id: first.successor_id.clone(),
            });
        }
    }
    Ok(result)
}

/// Earliest start that a single predecessor edge allows for its successor.
fn edge_candidate(
    dependency_type: DependencyType,
    predecessor: TaskSpan,
    lag_days: i64,
    duration: i64,
) -> NaiveDate {
    match dependency_type {
        DependencyType::FinishToStart => add_days(predecessor.end, lag_days),
        DependencyType::StartToStart => add_days(predecessor.start, lag_days),
        DependencyType::FinishToFinish => add_days(predecessor.end, lag_days - duration),
        DependencyType::StartToFinish => add_days(predecessor.start, lag_days - duration),
    }
}

/// Union of spans, or a zero-length span at `fallback` if there are none.
fn enclosing_span(
    spans: impl IntoIterator<Item = (NaiveDate, NaiveDate)>,
    fallback: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    spans
        .into_iter()
        .reduce(|(s1, e1), (s2, e2)| (s1.min(s2), e1.max(e2)))
        .unwrap_or((fallback, fallback))
}

fn run(template: &WorkBreakdownTemplate, start: NaiveDate, verbosity: u8) -> ScheduleResult {
    let index = PredecessorIndex::build(&template.dependencies);

    // Collect tasks. A repeated id keeps its first position but takes the
    // latest definition.
    let mut entries: FxHashMap<&str, TaskEntry> = FxHashMap::default();
    let mut task_ids: Vec<&str> = Vec::new();
    for (phase, package, task) in template.iter_tasks() {
        let entry = TaskEntry {
            phase,
            package,
            task,
        };
        if entries.insert(task.id.as_str(), entry).is_none() {
            task_ids.push(task.id.as_str());
        }
    }

    let mut spans: FxHashMap<&str, TaskSpan> = entries
        .iter()
        .map(|(&id, entry)| {
            let duration = i64::from(entry.task.estimated_duration_days);
            (id, TaskSpan::at(start, duration))
        })
        .collect();

    let topo = topological_order(&task_ids, &index);
    if !topo.is_acyclic() {
        for cycle in &topo.cycle_breaks {
            tracing::warn!(
                task_id = %cycle.task_id,
                successor_id = %cycle.successor_id,
                "Dependency cycle detected, skipping edge; dates inside the cycle are not reliable"
            );
        }
    }

    // Forward pass
    for &task_id in &topo.order {
        let Some(duration) = spans.get(task_id).map(|s| s.duration) else {
            continue;
        };

        let mut earliest_start = start;
        for dep in index.predecessors(task_id) {
            let Some(&predecessor) = spans.get(dep.predecessor_task_id.as_str()) else {
                continue;
            };
            let candidate = edge_candidate(
                dep.dependency_type,
                predecessor,
                i64::from(dep.lag_days),
                duration,
            );
            log_trace!(
                verbosity,
                "  {} -[{} {:+}]-> {}: candidate {}",
                dep.predecessor_task_id,
                dep.dependency_type,
                dep.lag_days,
                task_id,
                candidate
            );
            earliest_start = earliest_start.max(candidate);
        }

        let span = TaskSpan::at(earliest_start, duration);
        log_steps!(
            verbosity,
            "Placed {}: {} -> {} ({} days)",
            task_id,
            span.start,
            span.end,
            duration
        );
        spans.insert(task_id, span);
    }

    let project_end = spans.values().map(|s| s.end).max().unwrap_or(start);

    let schedule_task = |phase: &Phase, package: &Package, task: &Task| -> ScheduledTask {
        let span = spans
            .get(task.id.as_str())
            .copied()
            .unwrap_or_else(|| TaskSpan::at(start, i64::from(task.estimated_duration_days)));
        let slack_days = days_between(span.end, project_end);
        ScheduledTask {
            id: task.id.clone(),
            name: task.name.clone(),
            wbs_code: task.wbs_code.clone(),
            package_id: package.id.clone(),
            phase_id: phase.id.clone(),
            start: span.start,
            end: span.end,
            duration: span.duration,
            is_critical: slack_days <= 0,
            slack_days,
            estimated_cost: task.estimated_cost,
        }
    };

    let tasks: Vec<ScheduledTask> = task_ids
        .iter()
        .filter_map(|id| entries.get(id))
        .map(|e| schedule_task(e.phase, e.package, e.task))
        .collect();

    let critical_path: Vec<String> = tasks
        .iter()
        .filter(|t| t.is_critical)
        .map(|t| t.id.clone())
        .collect();

    // Rollup, in template order
    let phases: Vec<ScheduledPhase> = template
        .phases
        .iter()
        .map(|phase| {
            let packages: Vec<ScheduledPackage> = phase
                .packages
                .iter()
                .map(|package| {
                    let tasks: Vec<ScheduledTask> = package
                        .tasks
                        .iter()
                        .map(|task| schedule_task(phase, package, task))
                        .collect();
                    let (pkg_start, pkg_end) =
                        enclosing_span(tasks.iter().map(|t| (t.start, t.end)), start);
                    log_steps!(
                        verbosity,
                        "Package {}: {} -> {}",
                        package.id,
                        pkg_start,
                        pkg_end
                    );
                    ScheduledPackage {
                        id: package.id.clone(),
                        name: package.name.clone(),
                        wbs_code: package.wbs_code.clone(),
                        start: pkg_start,
                        end: pkg_end,
                        duration: days_between(pkg_start, pkg_end),
                        tasks,
                        estimated_cost: package.estimated_cost,
                    }
                })
                .collect();
            let (phase_start, phase_end) =
                enclosing_span(packages.iter().map(|p| (p.start, p.end)), start);
            ScheduledPhase {
                id: phase.id.clone(),
                name: phase.name.clone(),
                wbs_code: phase.wbs_code.clone(),
                start: phase_start,
                end: phase_end,
                duration: days_between(phase_start, phase_end),
                packages,
            }
        })
        .collect();

    let total_days = days_between(start, project_end);
    log_summary!(
        verbosity,
        "Scheduled {} tasks: {} -> {} ({} days, {} critical, {} cycle breaks)",
        tasks.len(),
        start,
        project_end,
        total_days,
        critical_path.len(),
        topo.cycle_breaks.len()
    );

    ScheduleResult {
        phases,
        tasks,
        total_days,
        critical_path,
        start_date: start,
        end_date: project_end,
        cycle_breaks: topo.cycle_breaks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dependency;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory sink for formatted tracing output.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with a WARN-level subscriber and return what it logged.
    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, logs.contents())
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Day offset from the standard test start date.
    fn day(n: i64) -> NaiveDate {
        add_days(d(2025, 3, 3), n)
    }

    fn make_task(id: &str, duration: u32) -> Task {
        Task {
            id: id.to_string(),
            name: format!("Task {id}"),
            wbs_code: String::new(),
            estimated_duration_days: duration,
            estimated_cost: None,
        }
    }

    fn make_package(id: &str, tasks: Vec<Task>) -> Package {
        Package {
            id: id.to_string(),
            name: format!("Package {id}"),
            wbs_code: String::new(),
            tasks,
            estimated_cost: None,
        }
    }

    fn make_phase(id: &str, packages: Vec<Package>) -> Phase {
        Phase {
            id: id.to_string(),
            name: format!("Phase {id}"),
            wbs_code: String::new(),
            packages,
        }
    }

    fn dep(pred: &str, succ: &str, dependency_type: DependencyType, lag: i32) -> Dependency {
        Dependency {
            predecessor_task_id: pred.to_string(),
            successor_task_id: succ.to_string(),
            dependency_type,
            lag_days: lag,
        }
    }

    fn fs(pred: &str, succ: &str, lag: i32) -> Dependency {
        dep(pred, succ, DependencyType::FinishToStart, lag)
    }

    /// One phase, one package holding every task.
    fn flat_template(tasks: Vec<Task>, dependencies: Vec<Dependency>) -> WorkBreakdownTemplate {
        WorkBreakdownTemplate {
            phases: vec![make_phase("ph", vec![make_package("wp", tasks)])],
            dependencies,
        }
    }

    fn schedule(template: &WorkBreakdownTemplate) -> ScheduleResult {
        calculate_schedule(template, Some(day(0)))
    }

    fn span_of(result: &ScheduleResult, id: &str) -> (NaiveDate, NaiveDate) {
        let task = result.task(id).unwrap();
        (task.start, task.end)
    }

    #[test]
    fn test_empty_template() {
        let result = schedule(&WorkBreakdownTemplate::default());
        assert!(result.phases.is_empty());
        assert!(result.tasks.is_empty());
        assert!(result.critical_path.is_empty());
        assert_eq!(result.total_days, 0);
        assert_eq!(result.start_date, result.end_date);
        assert_eq!(result.start_date, day(0));
    }

    #[test]
    fn test_single_task_baseline() {
        let result = schedule(&flat_template(vec![make_task("a", 5)], vec![]));

        let a = result.task("a").unwrap();
        assert_eq!(a.start, day(0));
        assert_eq!(a.end, day(5));
        assert_eq!(a.duration, 5);
        assert!(a.is_critical);
        assert_eq!(a.slack_days, 0);
        assert_eq!(a.package_id, "wp");
        assert_eq!(a.phase_id, "ph");
        assert_eq!(result.total_days, 5);
        assert_eq!(result.end_date, day(5));
        assert_eq!(result.critical_path, vec!["a".to_string()]);
    }

    #[test]
    fn test_zero_duration_task() {
        let result = schedule(&flat_template(vec![make_task("m", 0)], vec![]));
        assert_eq!(span_of(&result, "m"), (day(0), day(0)));
        assert_eq!(result.total_days, 0);
        assert!(result.task("m").unwrap().is_critical);
    }

    #[test]
    fn test_finish_to_start_with_lag() {
        for (lag, b_duration) in [(0, 1), (2, 4), (-1, 10)] {
            let template = flat_template(
                vec![make_task("a", 3), make_task("b", b_duration)],
                vec![fs("a", "b", lag)],
            );
            let result = schedule(&template);
            let b = result.task("b").unwrap();
            assert_eq!(b.start, day(3 + i64::from(lag)), "lag {lag}");
            assert_eq!(b.end, add_days(b.start, i64::from(b_duration)));
        }
    }

    #[test]
    fn test_start_to_start() {
        let template = flat_template(
            vec![make_task("a", 2), make_task("b", 3), make_task("c", 4)],
            vec![
                fs("a", "b", 0),
                dep("b", "c", DependencyType::StartToStart, 1),
            ],
        );
        let result = schedule(&template);
        assert_eq!(span_of(&result, "b"), (day(2), day(5)));
        assert_eq!(span_of(&result, "c"), (day(3), day(7)));
    }

    #[test]
    fn test_finish_to_finish() {
        // b must finish when a finishes (+1): start = a.end + 1 - b.duration
        let template = flat_template(
            vec![make_task("a", 10), make_task("b", 4)],
            vec![dep("a", "b", DependencyType::FinishToFinish, 1)],
        );
        let result = schedule(&template);
        assert_eq!(span_of(&result, "b"), (day(7), day(11)));
    }

    #[test]
    fn test_start_to_finish() {
        let template = flat_template(
            vec![make_task("a", 2), make_task("b", 3), make_task("c", 2)],
            vec![
                fs("a", "b", 0),
                dep("b", "c", DependencyType::StartToFinish, 4),
            ],
        );
        let result = schedule(&template);
        // b starts day 2, c must finish no earlier than day 6
        assert_eq!(span_of(&result, "c"), (day(4), day(6)));
    }

    #[test]
    fn test_multiple_predecessors_take_latest() {
        let template = flat_template(
            vec![make_task("a", 5), make_task("b", 8), make_task("c", 1)],
            vec![fs("a", "c", 0), fs("b", "c", 0)],
        );
        let result = schedule(&template);
        assert_eq!(span_of(&result, "c"), (day(8), day(9)));
    }

    #[test]
    fn test_start_date_is_a_floor() {
        // A large lead would pull b before the project start
        let template = flat_template(
            vec![make_task("a", 2), make_task("b", 5)],
            vec![
                fs("a", "b", -10),
                dep("a", "b", DependencyType::FinishToFinish, 0),
            ],
        );
        let result = schedule(&template);
        assert_eq!(span_of(&result, "b"), (day(0), day(5)));
        assert!(result.tasks.iter().all(|t| t.start >= result.start_date));
    }

    #[test]
    fn test_negative_lag_allows_overlap() {
        let template = flat_template(
            vec![make_task("a", 10), make_task("b", 3), make_task("c", 6)],
            vec![fs("a", "b", 0), dep("b", "c", DependencyType::FinishToFinish, -2)],
        );
        let result = schedule(&template);
        // b ends day 13, c must end by day 11 at the earliest -> starts day 5,
        // before its predecessor b even starts.
        assert_eq!(span_of(&result, "b"), (day(10), day(13)));
        assert_eq!(span_of(&result, "c"), (day(5), day(11)));
    }

    #[test]
    fn test_document_order_does_not_matter() {
        let template = flat_template(
            vec![make_task("c", 1), make_task("b", 2), make_task("a", 3)],
            vec![fs("a", "b", 0), fs("b", "c", 0)],
        );
        let result = schedule(&template);
        assert_eq!(span_of(&result, "a"), (day(0), day(3)));
        assert_eq!(span_of(&result, "b"), (day(3), day(5)));
        assert_eq!(span_of(&result, "c"), (day(5), day(6)));

        let ids: Vec<&str> = result.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_dependencies_across_phases() {
        let template = WorkBreakdownTemplate {
            phases: vec![
                make_phase("demo", vec![make_package("strip", vec![make_task("a", 4)])]),
                make_phase("build", vec![make_package("frame", vec![make_task("b", 6)])]),
            ],
            dependencies: vec![fs("a", "b", 1)],
        };
        let result = schedule(&template);

        assert_eq!(result.phases[0].start, day(0));
        assert_eq!(result.phases[0].end, day(4));
        assert_eq!(result.phases[1].start, day(5));
        assert_eq!(result.phases[1].end, day(11));
        assert_eq!(result.phases[1].duration, 6);
        assert_eq!(result.total_days, 11);
    }

    #[test]
    fn test_package_rollup() {
        let template = WorkBreakdownTemplate {
            phases: vec![make_phase(
                "ph",
                vec![
                    make_package("wp", vec![make_task("a", 3), make_task("b", 4)]),
                    make_package("empty", vec![]),
                ],
            )],
            dependencies: vec![fs("a", "b", 2)],
        };
        let result = schedule(&template);

        let packages = &result.phases[0].packages;
        assert_eq!((packages[0].start, packages[0].end), (day(0), day(9)));
        assert_eq!(packages[0].duration, 9);
        assert_eq!(packages[0].tasks.len(), 2);
        assert_eq!((packages[1].start, packages[1].end), (day(0), day(0)));
        assert_eq!(packages[1].duration, 0);
        assert!(packages[1].tasks.is_empty());

        assert_eq!(result.phases[0].start, day(0));
        assert_eq!(result.phases[0].end, day(9));
    }

    #[test]
    fn test_empty_phase_rollup() {
        let template = WorkBreakdownTemplate {
            phases: vec![
                make_phase("ph", vec![make_package("wp", vec![make_task("a", 3)])]),
                make_phase("later", vec![]),
            ],
            dependencies: vec![],
        };
        let result = schedule(&template);
        let empty = &result.phases[1];
        assert_eq!((empty.start, empty.end, empty.duration), (day(0), day(0), 0));
        assert!(empty.packages.is_empty());
    }

    #[test]
    fn test_phase_span_without_task_at_start() {
        let template = WorkBreakdownTemplate {
            phases: vec![
                make_phase("first", vec![make_package("wp1", vec![make_task("a", 5)])]),
                make_phase("second", vec![make_package("wp2", vec![make_task("b", 2)])]),
            ],
            dependencies: vec![fs("a", "b", 0)],
        };
        let result = schedule(&template);
        assert_eq!(result.phases[1].start, day(5));
        assert_eq!(result.phases[1].packages[0].start, day(5));
    }

    #[test]
    fn test_critical_path_by_project_end() {
        // Chain A: one long task. Chain B: two short ones.
        let template = flat_template(
            vec![make_task("a", 10), make_task("b1", 2), make_task("b2", 3)],
            vec![fs("b1", "b2", 0)],
        );
        let result = schedule(&template);

        assert_eq!(result.critical_path, vec!["a".to_string()]);
        assert!(result.task("a").unwrap().is_critical);
        assert!(!result.task("b1").unwrap().is_critical);
        assert!(!result.task("b2").unwrap().is_critical);
        assert_eq!(result.task("b2").unwrap().slack_days, 5);
        assert_eq!(result.task("b1").unwrap().slack_days, 8);
    }

    #[test]
    fn test_critical_flag_only_for_tasks_ending_at_project_end() {
        // a -> b is the longest chain, but only b finishes on the end date.
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 4), make_task("c", 7)],
            vec![fs("a", "b", 0)],
        );
        let result = schedule(&template);
        assert_eq!(result.end_date, day(7));
        assert_eq!(result.critical_path, vec!["b".to_string(), "c".to_string()]);
        assert!(!result.task("a").unwrap().is_critical);
    }

    #[test]
    fn test_idempotent() {
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 2), make_task("c", 4)],
            vec![
                fs("a", "b", 1),
                dep("a", "c", DependencyType::StartToStart, 2),
                fs("c", "b", 0),
            ],
        );
        let first = schedule(&template);
        let second = schedule(&template);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dangling_dependencies_ignored() {
        let tasks = vec![make_task("a", 3), make_task("b", 2)];
        let baseline = schedule(&flat_template(tasks.clone(), vec![fs("a", "b", 0)]));
        let with_dangling = schedule(&flat_template(
            tasks,
            vec![
                fs("a", "b", 0),
                fs("ghost", "a", 30),
                fs("b", "phantom", 0),
                fs("nobody", "nowhere", 5),
            ],
        ));

        assert_eq!(baseline.tasks, with_dangling.tasks);
        assert_eq!(baseline.total_days, with_dangling.total_days);
        assert!(!with_dangling.has_cycles());
    }

    #[test]
    fn test_cycle_terminates_and_keeps_all_tasks() {
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 2)],
            vec![fs("a", "b", 0), fs("b", "a", 0)],
        );
        let result = schedule(&template);

        let mut ids: Vec<&str> = result.tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(result.has_cycles());
        assert_eq!(result.cycle_breaks.len(), 1);

        // Deterministic: same input, same degraded answer
        assert_eq!(result, schedule(&template));
    }

    #[test]
    fn test_cycle_warning_emitted_when_silent() {
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 2)],
            vec![fs("a", "b", 0), fs("b", "a", 0)],
        );
        let config = ScheduleConfig::default();
        assert_eq!(config.verbosity, crate::logging::VERBOSITY_SILENT);

        let (result, logs) = capture_warnings(|| {
            calculate_schedule_with_config(&template, Some(day(0)), &config)
        });
        assert!(result.unwrap().has_cycles());
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("Dependency cycle detected"), "logs: {logs}");
        assert!(logs.contains("task_id=a"), "logs: {logs}");
        assert!(logs.contains("successor_id=b"), "logs: {logs}");
    }

    #[test]
    fn test_acyclic_schedule_logs_no_warning() {
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 2)],
            vec![fs("a", "b", 0)],
        );
        let (result, logs) = capture_warnings(|| schedule(&template));
        assert!(!result.has_cycles());
        assert!(logs.is_empty(), "logs: {logs}");
    }

    #[test]
    fn test_unknown_dependency_type_in_json_schedules_as_finish_to_start() {
        let json = |dependency_type: &str| {
            format!(
                r#"{{
                    "phases": [{{"id": "ph", "name": "Phase", "packages": [{{
                        "id": "wp", "name": "Package",
                        "tasks": [
                            {{"id": "a", "name": "Demo", "estimatedDurationDays": 3}},
                            {{"id": "b", "name": "Frame", "estimatedDurationDays": 4}}
                        ]
                    }}]}}],
                    "dependencies": [{{
                        "predecessorTaskId": "a", "successorTaskId": "b",
                        "dependencyType": "{dependency_type}", "lagDays": 1
                    }}]
                }}"#
            )
        };
        let finish_to_start: WorkBreakdownTemplate = serde_json::from_str(&json("FS")).unwrap();
        let unknown: WorkBreakdownTemplate = serde_json::from_str(&json("XX")).unwrap();
        let lowercase: WorkBreakdownTemplate = serde_json::from_str(&json("fs")).unwrap();

        assert_eq!(unknown, finish_to_start);
        assert_eq!(schedule(&unknown), schedule(&finish_to_start));
        assert_eq!(schedule(&lowercase), schedule(&finish_to_start));
        assert_eq!(span_of(&schedule(&unknown), "b"), (day(4), day(8)));
    }

    #[test]
    fn test_reject_policy_fails_on_cycle() {
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 2)],
            vec![fs("a", "b", 0), fs("b", "a", 0)],
        );
        let config = ScheduleConfig {
            cycle_policy: "reject".to_string(),
            ..Default::default()
        };
        let err = calculate_schedule_with_config(&template, Some(day(0)), &config).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::CyclicDependency {
                task_id: "a".to_string(),
                successor_id: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_reject_policy_accepts_acyclic() {
        let template = flat_template(
            vec![make_task("a", 3), make_task("b", 2)],
            vec![fs("a", "b", 0)],
        );
        let config = ScheduleConfig {
            cycle_policy: "reject".to_string(),
            verbosity: 3,
        };
        let result = calculate_schedule_with_config(&template, Some(day(0)), &config).unwrap();
        assert_eq!(result, schedule(&template));
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let config = ScheduleConfig {
            cycle_policy: "yolo".to_string(),
            ..Default::default()
        };
        let result =
            calculate_schedule_with_config(&WorkBreakdownTemplate::default(), None, &config);
        assert_eq!(
            result,
            Err(ScheduleError::UnknownCyclePolicy("yolo".to_string()))
        );
    }

    #[test]
    fn test_duplicate_task_ids_share_one_schedule() {
        let mut later = make_task("a", 6);
        later.name = "Redefined".to_string();
        let template = WorkBreakdownTemplate {
            phases: vec![make_phase(
                "ph",
                vec![
                    make_package("wp1", vec![make_task("a", 2), make_task("b", 1)]),
                    make_package("wp2", vec![later]),
                ],
            )],
            dependencies: vec![fs("a", "b", 0)],
        };
        let result = schedule(&template);

        let ids: Vec<&str> = result.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let a = result.task("a").unwrap();
        assert_eq!(a.name, "Redefined");
        assert_eq!(a.package_id, "wp2");
        assert_eq!((a.start, a.end), (day(0), day(6)));
        assert_eq!(span_of(&result, "b"), (day(6), day(7)));

        // Both tree occurrences report the shared timing
        let packages = &result.phases[0].packages;
        assert_eq!(packages[0].tasks[0].end, day(6));
        assert_eq!(packages[1].tasks[0].end, day(6));
    }

    #[test]
    fn test_default_start_is_today() {
        let result = calculate_schedule(&flat_template(vec![make_task("a", 1)], vec![]), None);
        let now = today();
        // Allow for the date rolling over between the two calls
        assert!(result.start_date == now || result.start_date == add_days(now, -1));
    }

    #[test]
    fn test_serialized_shape() {
        let result = schedule(&flat_template(vec![make_task("a", 2)], vec![]));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["totalDays"], 2);
        assert_eq!(json["startDate"], "2025-03-03");
        assert_eq!(json["endDate"], "2025-03-05");
        assert_eq!(json["criticalPath"][0], "a");
        assert_eq!(json["tasks"][0]["isCritical"], true);
        assert_eq!(json["phases"][0]["packages"][0]["tasks"][0]["id"], "a");
    }
}
