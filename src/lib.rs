//! Savings Projection - week-stepped savings forecasts from recurring cash flows
//!
//! This library provides:
//! - Frequency normalization of weekly, fortnightly, monthly and yearly payments
//! - Per-stream tax withholding and compounding interest
//! - A goal-seeking projection loop bounded by a hard step cap
//! - Aggregate and per-stream time series for charting
//! - Parallel projection of independent scenarios
//!
//! ```ignore
//! use savings_projection::{project, Frequency, StreamDefinition};
//! use chrono::Utc;
//!
//! let streams = vec![
//!     StreamDefinition::income("pay", 1200.0, Frequency::Fortnightly).with_tax(25.0),
//!     StreamDefinition::expense("rent", 350.0, Frequency::Weekly),
//! ];
//! let result = project(10_000.0, &streams, Utc::now());
//! println!("{} weeks", result.steps());
//! ```

pub mod error;
pub mod frequency;
pub mod output;
pub mod projection;
pub mod scenario;
pub mod stream;

// Re-export commonly used types
pub use error::{LoadError, ValidationError};
pub use frequency::{normalize_to_weekly, Frequency};
pub use projection::{
    project, project_now, ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionRun,
    RunStatus, Series, TimeSeriesPoint, HARD_CAP,
};
pub use scenario::{Scenario, ScenarioOutcome, ScenarioRunner};
pub use stream::{StreamDefinition, StreamKind};
