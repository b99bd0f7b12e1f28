//! Running state of a single projection

use chrono::{DateTime, Days, Duration, TimeZone};

use super::STEP_DAYS;

/// Balances and clock for one run; never shared between runs
#[derive(Debug, Clone)]
pub struct SimulationState<Tz: TimeZone> {
    /// Timestamp of the most recent observation
    pub current_week: DateTime<Tz>,
    /// Compounded balance per active stream, aligned with the active-stream list
    pub per_stream_balance: Vec<f64>,
    /// Sum of `per_stream_balance`
    pub aggregate_balance: f64,
    pub step_count: usize,
}

impl<Tz: TimeZone> SimulationState<Tz> {
    /// Zero balances for `stream_count` streams, clock at `start`
    pub fn new(start: DateTime<Tz>, stream_count: usize) -> Self {
        Self {
            current_week: start,
            per_stream_balance: vec![0.0; stream_count],
            aggregate_balance: 0.0,
            step_count: 0,
        }
    }

    /// Move the clock forward one step and return the new timestamp in epoch milliseconds
    pub fn advance_clock(&mut self) -> i64 {
        self.current_week = add_calendar_days(&self.current_week, STEP_DAYS);
        self.current_week.timestamp_millis()
    }

    /// Recompute the aggregate from the per-stream balances
    pub fn refresh_aggregate(&mut self) -> f64 {
        self.aggregate_balance = self.per_stream_balance.iter().sum();
        self.aggregate_balance
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.current_week.timestamp_millis()
    }
}

/// Add calendar days in the timestamp's own zone, keeping the local wall-clock time
///
/// Across a DST fold the earlier instant wins. If the wall-clock time falls in a
/// DST gap the step falls back to a fixed-length duration.
pub fn add_calendar_days<Tz: TimeZone>(t: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    let tz = t.timezone();
    t.naive_local()
        .checked_add_days(Days::new(days))
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .unwrap_or_else(|| t.clone() + Duration::days(days as i64))
}
