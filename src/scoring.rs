//! Marginal priority scoring.
//!
//! Scores are recomputed from the current repair state every time they are
//! requested: only segments still to replace count toward cost, duration,
//! houses and difficulty. Candidates are ranked by category tier, then
//! economic score, then cost, then duration. The combined scalar is only
//! reported.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::graph::NetworkGraph;
use crate::model::{BuildingCategory, BuildingIdx, Network};

const TIER_SCALE: f64 = 1e6;
const ECONOMIC_SCALE: f64 = 1e5;
const COST_PENALTY: f64 = 1e-2;
const DURATION_PENALTY: f64 = 1e2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreOptions {
    /// Added to the marginal cost before dividing houses by it.
    pub epsilon: f64,
    /// Multiply the economic score by the building's mutualization factor.
    pub use_mutualization: bool,
    /// Rank by category tier before anything else.
    pub use_category: bool,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            use_mutualization: true,
            use_category: true,
        }
    }
}

/// Priority of one building against the current repair state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityScore {
    pub category: BuildingCategory,
    /// `4 - weight`: 3 for hospitals down to 0 for other buildings.
    pub tier: u8,
    pub efficiency: f64,
    pub ease: f64,
    pub mutualization: f64,
    pub economic: f64,
    pub marginal_cost: f64,
    pub marginal_duration: f64,
    pub marginal_houses: u64,
    /// Single-number form of the score, for reports.
    pub value: f64,
}

impl PriorityScore {
    /// Orders by priority: `Greater` means `self` should be repaired first.
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        self.tier
            .cmp(&other.tier)
            .then_with(|| self.economic.total_cmp(&other.economic))
            .then_with(|| other.marginal_cost.total_cmp(&self.marginal_cost))
            .then_with(|| other.marginal_duration.total_cmp(&self.marginal_duration))
    }
}

/// Scores `building`, or returns `None` when it has no house left to
/// reconnect. `None` ranks below every real score and is never selected.
pub fn score(
    network: &Network,
    graph: &NetworkGraph,
    building: BuildingIdx,
    options: &ScoreOptions,
) -> Option<PriorityScore> {
    let aggregates = network.aggregates(building);
    if aggregates.houses_pending == 0 {
        return None;
    }

    let avg_difficulty = if aggregates.pending_segments == 0 {
        0.0
    } else {
        aggregates.difficulty / aggregates.pending_segments as f64
    };
    let efficiency = aggregates.houses_pending as f64 / (aggregates.cost + options.epsilon);
    let ease = 1.0 / (1.0 + avg_difficulty);
    let mutualization = if options.use_mutualization {
        graph.mutualization_factor(building)
    } else {
        1.0
    };
    let economic = efficiency * ease * mutualization;

    let category = network.building(building).category();
    let tier = if options.use_category {
        4 - category.weight()
    } else {
        0
    };

    let value = f64::from(tier) * TIER_SCALE + economic * ECONOMIC_SCALE
        - aggregates.cost * COST_PENALTY
        - aggregates.duration * DURATION_PENALTY;

    Some(PriorityScore {
        category,
        tier,
        efficiency,
        ease,
        mutualization,
        economic,
        marginal_cost: aggregates.cost,
        marginal_duration: aggregates.duration,
        marginal_houses: aggregates.houses_pending,
        value,
    })
}
