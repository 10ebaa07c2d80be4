//! Cost rollup over a work-breakdown template.

use crate::models::{Phase, WorkBreakdownTemplate};

fn phase_cost(phase: &Phase) -> f64 {
    phase
        .packages
        .iter()
        .map(|package| {
            package.estimated_cost.unwrap_or(0.0)
                + package
                    .tasks
                    .iter()
                    .map(|task| task.estimated_cost.unwrap_or(0.0))
                    .sum::<f64>()
        })
        .sum()
}

/// Sum of every package and task estimate. Missing estimates count as zero.
pub fn total_cost(template: &WorkBreakdownTemplate) -> f64 {
    template.phases.iter().map(phase_cost).sum()
}

/// Per-phase totals as `(phase_id, cost)`, in phase order.
pub fn phase_costs(template: &WorkBreakdownTemplate) -> Vec<(String, f64)> {
    template
        .phases
        .iter()
        .map(|phase| (phase.id.clone(), phase_cost(phase)))
        .collect()
}
