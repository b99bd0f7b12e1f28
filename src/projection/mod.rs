//! Projection engine for savings goals

mod state;
mod engine;
mod rates;
mod series;

pub use state::{SimulationState, add_calendar_days};
pub use engine::{ProjectionEngine, ProjectionConfig, ProjectionRun, RunStatus, project, project_now};
pub use rates::StreamRates;
pub use series::{ProjectionResult, Series, TimeSeriesPoint, AGGREGATE_LABEL};

// ============================================================================
// Stepping limits
// ============================================================================
// Every run advances one calendar week at a time and stops at the hard cap
// whether or not the goal was reached.

/// Maximum number of simulated weeks in any run (roughly 384 years)
pub const HARD_CAP: usize = 20_000;

/// Calendar days per simulated step
pub const STEP_DAYS: u64 = 7;
