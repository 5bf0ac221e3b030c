//! Core domain traits for the restoration planner.
//!
//! These are intentionally minimal. Concrete deployments can implement them
//! for their own price lists without touching the scheduling code.

use serde::{Deserialize, Serialize};

use crate::model::MaterialClass;

/// Unit rates for one material class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRates {
    /// Material cost per meter (€).
    pub cost_per_meter: f64,
    /// Work duration per meter (hours).
    pub duration_per_meter: f64,
}

impl MaterialRates {
    pub const fn new(cost_per_meter: f64, duration_per_meter: f64) -> Self {
        Self {
            cost_per_meter,
            duration_per_meter,
        }
    }
}

/// Provides per-meter cost and duration for each material class.
///
/// The rates are resolved once when a network is built; segments never
/// consult the table again afterwards.
pub trait RateTable {
    fn rates_for(&self, material: MaterialClass) -> MaterialRates;
}
