//! Error types for the restoration planner.

use thiserror::Error;

/// Hard failures surfaced to the caller.
///
/// Schema errors reject the whole input batch before any scheduling starts.
/// `Stalled` aborts a running schedule; no partial plan is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// A required column is absent on an input row.
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    /// A field is present but cannot be interpreted.
    #[error("row {row}: invalid value {value:?} for field `{field}`")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// A crew or house tally does not fit the report's counters.
    #[error("{quantity} overflows in phase {phase} (building {building})")]
    Overflow {
        quantity: &'static str,
        phase: u8,
        building: String,
    },

    /// A scheduler iteration selected a building but repaired nothing.
    #[error("scheduler made no progress at iteration {iteration} (building {building})")]
    Stalled { building: String, iteration: usize },
}

/// Convenience alias for results carrying [`PlannerError`].
pub type Result<T> = std::result::Result<T, PlannerError>;
