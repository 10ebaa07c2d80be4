//! Dependency index and topological ordering of template tasks.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{CycleBreak, Dependency};

/// Incoming edges per successor: task_id -> dependencies naming it as successor.
///
/// Edges keep their template order. Built fresh for every calculation.
#[derive(Debug, Default)]
pub struct PredecessorIndex<'a> {
    by_successor: FxHashMap<&'a str, Vec<&'a Dependency>>,
}

impl<'a> PredecessorIndex<'a> {
    pub fn build(dependencies: &'a [Dependency]) -> Self {
        let mut by_successor: FxHashMap<&'a str, Vec<&'a Dependency>> =
            FxHashMap::with_capacity_and_hasher(dependencies.len(), Default::default());
        for dep in dependencies {
            by_successor
                .entry(dep.successor_task_id.as_str())
                .or_default()
                .push(dep);
        }
        Self { by_successor }
    }

    /// Direct predecessor edges of `task_id`, empty if it has none.
    pub fn predecessors(&self, task_id: &str) -> &[&'a Dependency] {
        self.by_successor
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    /// On the current traversal path.
    Temporary,
    /// Emitted into the order.
    Permanent,
}

/// A linear order over task ids plus the edges that had to be skipped to get it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopologicalOrder<'a> {
    pub order: Vec<&'a str>,
    pub cycle_breaks: Vec<CycleBreak>,
}

impl TopologicalOrder<'_> {
    pub fn is_acyclic(&self) -> bool {
        self.cycle_breaks.is_empty()
    }
}

/// Order `task_ids` so that every task follows its direct predecessors.
///
/// Depth-first with temporary/permanent marks, driven by an explicit stack.
/// Roots are visited in the order given, predecessors in edge order. Edges whose
/// predecessor is not one of `task_ids` are ignored. Reaching a node that is
/// still temporarily marked means a cycle: the edge is recorded as a
/// `CycleBreak` and not followed, so the order always covers every task.
pub fn topological_order<'a>(
    task_ids: &[&'a str],
    index: &PredecessorIndex<'a>,
) -> TopologicalOrder<'a> {
    let known: FxHashSet<&str> = task_ids.iter().copied().collect();
    let mut marks: FxHashMap<&'a str, Mark> =
        FxHashMap::with_capacity_and_hasher(task_ids.len(), Default::default());
    let mut order: Vec<&'a str> = Vec::with_capacity(known.len());
    let mut cycle_breaks = Vec::new();

    // (node, index of the next predecessor edge to follow)
    let mut stack: Vec<(&'a str, usize)> = Vec::new();

    for &root in task_ids {
        if marks.contains_key(root) {
            continue;
        }
        marks.insert(root, Mark::Temporary);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let preds = index.predecessors(node);

            if next >= preds.len() {
                stack.pop();
                marks.insert(node, Mark::Permanent);
                order.push(node);
                continue;
            }

            frame.1 += 1;
            let pred = preds[next].predecessor_task_id.as_str();
            if !known.contains(pred) {
                continue;
            }
            match marks.get(pred) {
                Some(Mark::Permanent) => {}
                Some(Mark::Temporary) => cycle_breaks.push(CycleBreak {
                    task_id: pred.to_string(),
                    successor_id: node.to_string(),
                }),
                None => {
                    marks.insert(pred, Mark::Temporary);
                    stack.push((pred, 0));
                }
            }
        }
    }

    TopologicalOrder {
        order,
        cycle_breaks,
    }
}
