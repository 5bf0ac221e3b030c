//! Greedy restoration scheduler.
//!
//! Each iteration rescores every pending building against the current
//! network state, repairs the best one, and records what that repair
//! realized. Repairs through shared segments shrink other buildings'
//! aggregates, so nothing is cached between iterations.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::graph::NetworkGraph;
use crate::model::{BuildingCategory, BuildingIdx, Network};
use crate::scoring::{score, PriorityScore, ScoreOptions};

/// One scheduler selection. Values are captured at selection time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairPlanEntry {
    /// Position in the repair order, starting at 1.
    pub phase_order: usize,
    pub building_id: String,
    pub category: BuildingCategory,
    pub realized_cost: f64,
    pub realized_duration: f64,
    pub houses_reconnected: u64,
    pub score_at_selection: f64,
    pub segments_repaired: Vec<String>,
}

/// A building that stopped being pending because a shared segment was
/// repaired through another building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedCompletion {
    pub building_id: String,
    pub completed_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepairPlan {
    pub entries: Vec<RepairPlanEntry>,
    /// Buildings with no segment to replace at the start.
    pub already_intact: Vec<String>,
    /// Pending buildings finished by another building's repair.
    pub shared_completions: Vec<SharedCompletion>,
    /// Buildings left with segments to replace that serve no house.
    pub unserved: Vec<String>,
}

impl RepairPlan {
    pub fn total_cost(&self) -> f64 {
        self.entries.iter().map(|entry| entry.realized_cost).sum()
    }

    pub fn houses_reconnected(&self) -> u64 {
        self.entries.iter().map(|entry| entry.houses_reconnected).sum()
    }
}

type Candidate = (BuildingIdx, PriorityScore);

fn rank(network: &Network, a: &Candidate, b: &Candidate) -> Ordering {
    a.1.cmp_priority(&b.1)
        .then_with(|| network.building(b.0).id().cmp(network.building(a.0).id()))
}

fn check_progress(
    building: &str,
    iteration: usize,
    repaired: &[String],
    still_pending: bool,
) -> Result<()> {
    if repaired.is_empty() || still_pending {
        return Err(PlannerError::Stalled {
            building: building.to_string(),
            iteration,
        });
    }
    Ok(())
}

/// Runs the greedy loop until no building is pending.
///
/// The network is mutated in place: on success every segment reachable
/// from a building with houses to reconnect is intact. Segments owned only
/// by buildings with no house to reconnect stay `ToReplace` and their
/// buildings are listed in [`RepairPlan::unserved`].
pub fn schedule(network: &mut Network, options: &ScoreOptions) -> Result<RepairPlan> {
    let graph = NetworkGraph::build(network);

    let mut plan = RepairPlan::default();
    let mut pending: Vec<BuildingIdx> = Vec::new();
    for idx in network.building_indices() {
        let building = network.building(idx);
        if network.is_pending(idx) {
            pending.push(idx);
        } else if !building.has_work(network.segments()) {
            plan.already_intact.push(building.id().to_string());
        }
    }

    let shared_segments = network
        .segment_indices()
        .filter(|&idx| graph.segment_sharing(idx) > 1)
        .count();

    info!(
        buildings = network.buildings().len(),
        pending = pending.len(),
        already_intact = plan.already_intact.len(),
        shared_links = graph.edge_count(),
        shared_segments,
        "starting restoration schedule"
    );

    let mut iteration = 0;
    while !pending.is_empty() {
        iteration += 1;

        let best = {
            let network = &*network;
            pending
                .par_iter()
                .filter_map(|&idx| score(network, &graph, idx, options).map(|s| (idx, s)))
                .max_by(|a, b| rank(network, a, b))
        };

        let Some((selected, selected_score)) = best else {
            let building = network.building(pending[0]).id().to_string();
            return Err(PlannerError::Stalled { building, iteration });
        };

        let repaired = network.repair_building(selected);
        let building = network.building(selected);
        check_progress(building.id(), iteration, &repaired, network.is_pending(selected))?;

        debug!(
            iteration,
            building_id = %building.id(),
            category = ?building.category(),
            cost = selected_score.marginal_cost,
            duration = selected_score.marginal_duration,
            houses = selected_score.marginal_houses,
            score = selected_score.value,
            "building selected"
        );

        plan.entries.push(RepairPlanEntry {
            phase_order: iteration,
            building_id: building.id().to_string(),
            category: building.category(),
            realized_cost: selected_score.marginal_cost,
            realized_duration: selected_score.marginal_duration,
            houses_reconnected: selected_score.marginal_houses,
            score_at_selection: selected_score.value,
            segments_repaired: repaired,
        });

        let mut remaining = Vec::with_capacity(pending.len());
        for idx in pending {
            if idx == selected {
                continue;
            }
            if network.is_pending(idx) {
                remaining.push(idx);
            } else if !network.building(idx).has_work(network.segments()) {
                plan.shared_completions.push(SharedCompletion {
                    building_id: network.building(idx).id().to_string(),
                    completed_by: network.building(selected).id().to_string(),
                });
            }
        }
        pending = remaining;
    }

    plan.unserved = network
        .buildings()
        .iter()
        .filter(|building| building.has_work(network.segments()) && !building.is_pending(network.segments()))
        .map(|building| building.id().to_string())
        .collect();

    info!(
        entries = plan.entries.len(),
        shared_completions = plan.shared_completions.len(),
        unserved = plan.unserved.len(),
        total_cost = plan.total_cost(),
        "restoration schedule complete"
    );

    Ok(plan)
}
