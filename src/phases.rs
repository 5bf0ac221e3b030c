//! Construction phase partitioning.
//!
//! Hospitals always go to phase 0. Every other entry is walked in repair
//! order and bucketed by cumulative cost against the total cost of the
//! non-hospital entries: phase 1 up to the first threshold, phases 2 and 3
//! up to the next ones, phase 4 for the remainder. An entry that pushes the
//! running total past a boundary lands in the phase it crossed into.

use serde::{Deserialize, Serialize};

use crate::model::BuildingCategory;
use crate::scheduler::RepairPlanEntry;

pub const EMERGENCY_PHASE: u8 = 0;
pub const FINAL_PHASE: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseOptions {
    /// Cumulative cost fractions closing phases 1, 2 and 3.
    pub thresholds: [f64; 3],
}

impl Default for PhaseOptions {
    fn default() -> Self {
        Self {
            thresholds: [0.40, 0.60, 0.80],
        }
    }
}

/// A plan entry annotated with its construction phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhasedEntry {
    pub phase: u8,
    pub entry: RepairPlanEntry,
}

fn phase_for(cumulative: f64, boundaries: &[f64; 3]) -> u8 {
    boundaries
        .iter()
        .position(|&boundary| cumulative <= boundary)
        .map(|i| i as u8 + 1)
        .unwrap_or(FINAL_PHASE)
}

/// Assigns a phase to every entry, preserving repair order.
pub fn assign_phases(entries: &[RepairPlanEntry], options: &PhaseOptions) -> Vec<PhasedEntry> {
    let non_hospital_total: f64 = entries
        .iter()
        .filter(|entry| entry.category != BuildingCategory::Hospital)
        .map(|entry| entry.realized_cost)
        .sum();
    let boundaries = options.thresholds.map(|fraction| fraction * non_hospital_total);

    let mut cumulative = 0.0;
    entries
        .iter()
        .map(|entry| {
            let phase = if entry.category == BuildingCategory::Hospital {
                EMERGENCY_PHASE
            } else {
                cumulative += entry.realized_cost;
                phase_for(cumulative, &boundaries)
            };
            PhasedEntry {
                phase,
                entry: entry.clone(),
            }
        })
        .collect()
}
