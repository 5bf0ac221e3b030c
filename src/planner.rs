//! End-to-end restoration planning: records to phased execution report.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::execution::{simulate, ExecutionOptions, ExecutionReport};
use crate::model::Network;
use crate::phases::{assign_phases, PhaseOptions, PhasedEntry};
use crate::records::{build_network, NetworkRecord};
use crate::scheduler::{schedule, RepairPlan};
use crate::scoring::ScoreOptions;
use crate::traits::RateTable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    pub score: ScoreOptions,
    pub phases: PhaseOptions,
    pub execution: ExecutionOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerResult {
    pub plan: RepairPlan,
    pub phased: Vec<PhasedEntry>,
    pub report: ExecutionReport,
}

/// Validates `records`, then schedules, partitions and simulates.
///
/// Schema errors are returned before anything is scheduled.
pub fn plan<R: RateTable + ?Sized>(
    records: &[NetworkRecord],
    rates: &R,
    options: &PlannerOptions,
) -> Result<PlannerResult> {
    let mut network = build_network(records, rates)?;
    plan_network(&mut network, options)
}

/// Plans an already built network, repairing it in place.
pub fn plan_network(network: &mut Network, options: &PlannerOptions) -> Result<PlannerResult> {
    let plan = schedule(network, &options.score)?;
    let phased = assign_phases(&plan.entries, &options.phases);
    let report = simulate(&phased, &options.execution)?;

    info!(
        entries = plan.entries.len(),
        phases = report.phases.len(),
        total_cost = report.total_cost,
        total_duration_hours = report.total_duration,
        warnings = report.warnings().count(),
        "restoration plan ready"
    );

    Ok(PlannerResult { plan, phased, report })
}
