//! restoration-planner
//!
//! Plans the repair order of a damaged electrical distribution network:
//! greedy marginal scoring over buildings, construction phase bucketing,
//! and parallel-crew execution estimates.

pub mod error;
pub mod traits;
pub mod rates;
pub mod model;
pub mod records;
pub mod graph;
pub mod scoring;
pub mod scheduler;
pub mod phases;
pub mod execution;
pub mod planner;

pub use error::{PlannerError, Result};
pub use planner::{plan, plan_network, PlannerOptions, PlannerResult};
