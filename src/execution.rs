//! Phase execution simulation.
//!
//! Phases run one after another; buildings inside a phase are worked on by
//! parallel crews, so a phase lasts as long as its longest repair while its
//! cost and crew size add up. Hospital repairs carry a safety margin and are
//! checked against backup generator autonomy. An overrun is reported as a
//! warning on the phase and never stops the plan.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PlannerError, Result};
use crate::model::BuildingCategory;
use crate::phases::PhasedEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionOptions {
    /// Crew members needed per reconnected house.
    pub workers_per_house: u32,
    /// Extra duration applied to hospital repairs (0.2 = +20%).
    pub hospital_margin: f64,
    /// Hours a hospital can run on its backup generator.
    pub generator_autonomy_hours: f64,
    /// Cost of one crew for one shift.
    pub crew_day_rate: f64,
    pub shift_hours: f64,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            workers_per_house: 4,
            hospital_margin: 0.20,
            generator_autonomy_hours: 20.0,
            crew_day_rate: 300.0,
            shift_hours: 8.0,
        }
    }
}

impl ExecutionOptions {
    fn hourly_crew_rate(&self) -> f64 {
        if self.shift_hours > 0.0 {
            self.crew_day_rate / self.shift_hours
        } else {
            0.0
        }
    }
}

/// Non-fatal conditions attached to a phase summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PhaseWarning {
    GeneratorAutonomyExceeded {
        building_id: String,
        duration_hours: f64,
        autonomy_hours: f64,
    },
}

impl fmt::Display for PhaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseWarning::GeneratorAutonomyExceeded {
                building_id,
                duration_hours,
                autonomy_hours,
            } => write!(
                f,
                "hospital {building_id} repair takes {duration_hours:.1}h, beyond {autonomy_hours:.1}h of generator autonomy"
            ),
        }
    }
}

/// How one building's repair plays out inside its phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingExecution {
    pub building_id: String,
    pub category: BuildingCategory,
    pub cost: f64,
    /// Duration after any hospital margin.
    pub duration: f64,
    pub workers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub phase: u8,
    pub buildings: Vec<BuildingExecution>,
    pub phase_cost: f64,
    pub phase_duration: f64,
    pub phase_workers: u64,
    /// Crew cost over the phase duration, kept apart from material cost.
    pub labor_cost: f64,
    pub houses_reconnected: u64,
    pub warnings: Vec<PhaseWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionReport {
    pub phases: Vec<PhaseSummary>,
    pub total_cost: f64,
    pub total_labor_cost: f64,
    pub total_duration: f64,
    pub peak_workers: u64,
    pub houses_reconnected: u64,
}

impl ExecutionReport {
    pub fn warnings(&self) -> impl Iterator<Item = &PhaseWarning> {
        self.phases.iter().flat_map(|phase| phase.warnings.iter())
    }

    pub fn phase(&self, phase: u8) -> Option<&PhaseSummary> {
        self.phases.iter().find(|summary| summary.phase == phase)
    }
}

fn execute_entry(
    phased: &PhasedEntry,
    options: &ExecutionOptions,
    warnings: &mut Vec<PhaseWarning>,
) -> Result<BuildingExecution> {
    let entry = &phased.entry;
    let workers = entry
        .houses_reconnected
        .checked_mul(u64::from(options.workers_per_house))
        .ok_or_else(|| PlannerError::Overflow {
            quantity: "workers",
            phase: phased.phase,
            building: entry.building_id.clone(),
        })?;
    let mut duration = entry.realized_duration;

    if entry.category == BuildingCategory::Hospital {
        duration *= 1.0 + options.hospital_margin;
        if duration > options.generator_autonomy_hours {
            warn!(
                building_id = %entry.building_id,
                phase = phased.phase,
                duration_hours = duration,
                autonomy_hours = options.generator_autonomy_hours,
                "hospital repair exceeds generator autonomy"
            );
            warnings.push(PhaseWarning::GeneratorAutonomyExceeded {
                building_id: entry.building_id.clone(),
                duration_hours: duration,
                autonomy_hours: options.generator_autonomy_hours,
            });
        }
    }

    Ok(BuildingExecution {
        building_id: entry.building_id.clone(),
        category: entry.category,
        cost: entry.realized_cost,
        duration,
        workers,
    })
}

fn execute_phase(
    phase: u8,
    entries: &[&PhasedEntry],
    options: &ExecutionOptions,
) -> Result<PhaseSummary> {
    let mut warnings = Vec::new();
    let mut buildings = Vec::with_capacity(entries.len());
    let mut phase_workers: u64 = 0;
    for phased in entries {
        let execution = execute_entry(phased, options, &mut warnings)?;
        phase_workers = phase_workers
            .checked_add(execution.workers)
            .ok_or_else(|| PlannerError::Overflow {
                quantity: "phase workers",
                phase,
                building: execution.building_id.clone(),
            })?;
        buildings.push(execution);
    }

    let phase_cost: f64 = buildings.iter().map(|b| b.cost).sum();
    let phase_duration = buildings.iter().map(|b| b.duration).fold(0.0, f64::max);
    let houses_reconnected: u64 = entries.iter().map(|p| p.entry.houses_reconnected).sum();

    Ok(PhaseSummary {
        phase,
        buildings,
        phase_cost,
        phase_duration,
        phase_workers,
        labor_cost: phase_duration * options.hourly_crew_rate(),
        houses_reconnected,
        warnings,
    })
}

/// Simulates every non-empty phase in ascending phase order.
///
/// Fails with [`PlannerError::Overflow`] when a crew tally exceeds `u64`.
pub fn simulate(phased: &[PhasedEntry], options: &ExecutionOptions) -> Result<ExecutionReport> {
    let mut by_phase: BTreeMap<u8, Vec<&PhasedEntry>> = BTreeMap::new();
    for entry in phased {
        by_phase.entry(entry.phase).or_default().push(entry);
    }

    let mut report = ExecutionReport::default();
    for (phase, entries) in by_phase {
        let summary = execute_phase(phase, &entries, options)?;
        info!(
            phase,
            buildings = summary.buildings.len(),
            cost = summary.phase_cost,
            duration_hours = summary.phase_duration,
            workers = summary.phase_workers,
            warnings = summary.warnings.len(),
            "phase simulated"
        );

        report.total_cost += summary.phase_cost;
        report.total_labor_cost += summary.labor_cost;
        report.total_duration += summary.phase_duration;
        report.peak_workers = report.peak_workers.max(summary.phase_workers);
        report.houses_reconnected += summary.houses_reconnected;
        report.phases.push(summary);
    }

    Ok(report)
}
