//! Week-stepped savings projection

use chrono::{DateTime, Local, TimeZone};

use super::rates::StreamRates;
use super::series::{ProjectionResult, Series, TimeSeriesPoint, AGGREGATE_LABEL};
use super::state::SimulationState;
use super::HARD_CAP;
use crate::stream::{resolve_labels, StreamDefinition};

/// Goal and step limit for a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    /// Stop once the aggregate balance is at or above this amount
    pub goal: f64,

    /// Maximum simulated weeks; anything above the hard cap is clamped to it
    pub max_steps: usize,
}

impl ProjectionConfig {
    pub fn new(goal: f64) -> Self {
        Self { goal, max_steps: HARD_CAP }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Step limit actually enforced
    pub fn step_limit(&self) -> usize {
        self.max_steps.min(HARD_CAP)
    }
}

/// Where a run stands after the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Aggregate balance is no longer below the goal
    GoalReached,
    /// Step limit hit with the goal still out of reach
    CapReached,
}

impl RunStatus {
    pub fn is_terminated(self) -> bool {
        self != RunStatus::Running
    }
}

/// A projection in progress
///
/// `advance` can be called repeatedly with small step budgets so a caller can
/// interleave other work or abandon the run between chunks. Stepping in chunks
/// produces exactly the same series as a single call.
#[derive(Debug, Clone)]
pub struct ProjectionRun<Tz: TimeZone> {
    goal: f64,
    step_limit: usize,
    rates: Vec<StreamRates>,
    state: SimulationState<Tz>,
    aggregate: Vec<TimeSeriesPoint>,
    per_stream: Vec<Series>,
}

impl<Tz: TimeZone> ProjectionRun<Tz> {
    /// Set up a run over the active streams, with the zero observation recorded at `start`
    pub fn new(config: &ProjectionConfig, streams: &[StreamDefinition], start: DateTime<Tz>) -> Self {
        let labels = resolve_labels(streams);
        let origin = TimeSeriesPoint { timestamp: start.timestamp_millis(), value: 0.0 };

        let mut rates = Vec::with_capacity(streams.len());
        let mut per_stream = Vec::with_capacity(streams.len());
        for (stream, label) in streams.iter().zip(labels) {
            if !stream.is_active {
                continue;
            }
            rates.push(StreamRates::from_definition(stream));
            per_stream.push(Series {
                label,
                stream_id: Some(stream.id.clone()),
                kind: Some(stream.kind),
                points: vec![origin],
            });
        }

        Self {
            goal: config.goal,
            step_limit: config.step_limit(),
            state: SimulationState::new(start, rates.len()),
            rates,
            aggregate: vec![origin],
            per_stream,
        }
    }

    pub fn status(&self) -> RunStatus {
        if !(self.state.aggregate_balance < self.goal) {
            RunStatus::GoalReached
        } else if self.state.step_count >= self.step_limit {
            RunStatus::CapReached
        } else {
            RunStatus::Running
        }
    }

    /// Simulate up to `max_steps` more weeks, stopping early if the run terminates
    pub fn advance(&mut self, max_steps: usize) -> RunStatus {
        for _ in 0..max_steps {
            if self.status().is_terminated() {
                break;
            }
            self.step();
        }
        self.status()
    }

    /// Simulate until the goal is reached or the step limit is hit
    pub fn run_to_end(&mut self) -> RunStatus {
        self.advance(self.step_limit)
    }

    fn step(&mut self) {
        let timestamp = self.state.advance_clock();

        for ((balance, rates), series) in self
            .state
            .per_stream_balance
            .iter_mut()
            .zip(&self.rates)
            .zip(&mut self.per_stream)
        {
            *balance = rates.step(*balance);
            series.points.push(TimeSeriesPoint { timestamp, value: *balance });
        }

        let value = self.state.refresh_aggregate();
        self.aggregate.push(TimeSeriesPoint { timestamp, value });
        self.state.step_count += 1;
    }

    pub fn state(&self) -> &SimulationState<Tz> {
        &self.state
    }

    pub fn step_count(&self) -> usize {
        self.state.step_count
    }

    pub fn aggregate_balance(&self) -> f64 {
        self.state.aggregate_balance
    }

    /// Hand the accumulated series to the caller, whether or not the run terminated
    pub fn finish(self) -> ProjectionResult {
        let mut series = Vec::with_capacity(self.per_stream.len() + 1);
        series.push(Series {
            label: AGGREGATE_LABEL.to_string(),
            stream_id: None,
            kind: None,
            points: self.aggregate,
        });
        series.extend(self.per_stream);
        ProjectionResult::from_series(series)
    }
}

/// Projects savings for a goal across any number of stream sets
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Start a run that the caller steps manually
    pub fn start<Tz: TimeZone>(&self, streams: &[StreamDefinition], start: DateTime<Tz>) -> ProjectionRun<Tz> {
        ProjectionRun::new(&self.config, streams, start)
    }

    /// Run a full projection starting at `start`
    pub fn project<Tz: TimeZone>(&self, streams: &[StreamDefinition], start: DateTime<Tz>) -> ProjectionResult {
        let mut run = self.start(streams, start);
        log::debug!(
            "projecting {} active of {} streams toward goal {} (limit {} weeks)",
            run.rates.len(),
            streams.len(),
            self.config.goal,
            run.step_limit,
        );

        let status = run.run_to_end();
        log::debug!(
            "projection stopped after {} weeks: {:?}, final balance {:.2}",
            run.step_count(),
            status,
            run.aggregate_balance(),
        );

        run.finish()
    }
}

/// Project `streams` toward `goal` from an explicit start time
pub fn project<Tz: TimeZone>(goal: f64, streams: &[StreamDefinition], start: DateTime<Tz>) -> ProjectionResult {
    ProjectionEngine::new(ProjectionConfig::new(goal)).project(streams, start)
}

/// Project `streams` toward `goal` starting from the current local time
pub fn project_now(goal: f64, streams: &[StreamDefinition]) -> ProjectionResult {
    project(goal, streams, Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::Frequency;
    use crate::stream::StreamKind;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::Utc;

    const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_single_income_reaches_goal_linearly() {
        let streams = vec![StreamDefinition::income("pay", 100.0, Frequency::Weekly)];
        let result = project(1000.0, &streams, start());

        let values: Vec<f64> = result.aggregate().values().collect();
        assert_eq!(values.len(), 11);
        for (week, value) in values.iter().enumerate() {
            assert_relative_eq!(*value, 100.0 * week as f64);
        }
        assert_eq!(result.steps(), 10);
        assert_relative_eq!(result.final_balance(), 1000.0);
    }

    #[test]
    fn test_income_and_expense() {
        let streams = vec![
            StreamDefinition::income("pay", 100.0, Frequency::Weekly),
            StreamDefinition::expense("rent", 40.0, Frequency::Weekly),
        ];
        let result = project(300.0, &streams, start());

        assert_eq!(result.steps(), 5);
        assert_relative_eq!(result.final_balance(), 300.0, epsilon = 1e-9);
        assert_relative_eq!(result.stream("pay").unwrap().last_value().unwrap(), 500.0);
        assert_relative_eq!(result.stream("rent").unwrap().last_value().unwrap(), -200.0);
    }

    #[test]
    fn test_taxed_monthly_with_interest_first_step() {
        let streams = vec![StreamDefinition::income("pay", 1000.0, Frequency::Monthly)
            .with_tax(20.0)
            .with_interest(5.0, Frequency::Yearly)];
        let result = ProjectionEngine::new(ProjectionConfig::new(1.0e6).with_max_steps(1))
            .project(&streams, start());

        let contribution = 1000.0 * 12.0 / 52.0 * 0.8;
        let expected = contribution * (1.0 + 0.05 / 52.0);
        assert_abs_diff_eq!(result.stream("pay").unwrap().points[1].value, expected, epsilon = 1e-6);
        assert_abs_diff_eq!(result.aggregate().points[1].value, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_non_positive_goal_records_only_origin() {
        let streams = vec![
            StreamDefinition::income("pay", 100.0, Frequency::Weekly),
            StreamDefinition::expense("rent", 40.0, Frequency::Weekly),
        ];
        for goal in [0.0, -50.0] {
            let result = project(goal, &streams, start());
            assert_eq!(result.series().len(), 3);
            for series in result.series() {
                assert_eq!(series.points.len(), 1);
                assert_eq!(series.points[0].value, 0.0);
                assert_eq!(series.points[0].timestamp, start().timestamp_millis());
            }
        }
    }

    #[test]
    fn test_no_active_streams_runs_to_cap() {
        let streams = vec![StreamDefinition::income("pay", 100.0, Frequency::Weekly).inactive()];
        let result = project(10.0, &streams, start());

        assert_eq!(result.series().len(), 1);
        assert_eq!(result.steps(), HARD_CAP);
        assert!(result.aggregate().values().all(|v| v == 0.0));

        let empty = project(10.0, &[], start());
        assert_eq!(empty.steps(), HARD_CAP);
    }

    #[test]
    fn test_unreachable_goal_stops_at_cap() {
        let streams = vec![
            StreamDefinition::income("pay", 10.0, Frequency::Weekly),
            StreamDefinition::expense("rent", 20.0, Frequency::Weekly),
        ];
        let result = project(100.0, &streams, start());
        assert_eq!(result.steps(), HARD_CAP);
        assert!(!result.reaches(100.0));
        assert_relative_eq!(result.final_balance(), -10.0 * HARD_CAP as f64, max_relative = 1e-9);
    }

    #[test]
    fn test_max_steps_is_clamped_to_hard_cap() {
        let config = ProjectionConfig::new(1.0).with_max_steps(HARD_CAP * 3);
        assert_eq!(config.step_limit(), HARD_CAP);

        let result = ProjectionEngine::new(config).project(&[], start());
        assert_eq!(result.steps(), HARD_CAP);
    }

    #[test]
    fn test_timestamps_step_by_one_week() {
        let streams = vec![StreamDefinition::income("pay", 1.0, Frequency::Yearly)];
        let result = project(2.0, &streams, start());

        for series in result.series() {
            for pair in series.points.windows(2) {
                assert_eq!(pair[1].timestamp - pair[0].timestamp, WEEK_MS);
            }
        }
    }

    #[test]
    fn test_aggregate_is_sum_of_streams() {
        let streams = vec![
            StreamDefinition::income("pay", 950.0, Frequency::Fortnightly)
                .with_tax(32.5)
                .with_interest(4.0, Frequency::Yearly),
            StreamDefinition::expense("loan", 120.0, Frequency::Monthly)
                .with_interest(7.0, Frequency::Yearly),
            StreamDefinition::income("gift", 500.0, Frequency::Yearly),
        ];
        let result = project(25_000.0, &streams, start());
        let aggregate = result.aggregate();

        for (idx, point) in aggregate.points.iter().enumerate() {
            let sum: f64 = result.stream_series().iter().map(|s| s.points[idx].value).sum();
            assert_relative_eq!(point.value, sum, max_relative = 1e-9);
        }
        assert!(result.reaches(25_000.0));
    }

    #[test]
    fn test_inactive_streams_are_skipped_but_keep_label_positions() {
        let streams = vec![
            StreamDefinition::income("a", 10.0, Frequency::Weekly).inactive(),
            StreamDefinition::income("b", 10.0, Frequency::Weekly),
            StreamDefinition::expense("c", 1.0, Frequency::Weekly).with_label("Coffee"),
        ];
        let result = project(50.0, &streams, start());

        let labels: Vec<&str> = result.series().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec![AGGREGATE_LABEL, "Income 2", "Coffee"]);
        assert_eq!(result.stream_series()[1].kind, Some(StreamKind::Expense));
        assert!(result.stream("a").is_none());
    }

    #[test]
    fn test_chunked_run_matches_single_call() {
        let streams = vec![
            StreamDefinition::income("pay", 300.0, Frequency::Fortnightly)
                .with_interest(3.0, Frequency::Monthly),
            StreamDefinition::expense("bills", 80.0, Frequency::Weekly),
        ];
        let engine = ProjectionEngine::new(ProjectionConfig::new(5_000.0));

        let mut run = engine.start(&streams, start());
        let mut status = RunStatus::Running;
        while !status.is_terminated() {
            status = run.advance(3);
        }
        assert_eq!(status, RunStatus::GoalReached);

        assert_eq!(run.finish(), engine.project(&streams, start()));
    }

    #[test]
    fn test_status_transitions() {
        let streams = vec![StreamDefinition::income("pay", 100.0, Frequency::Weekly)];
        let engine = ProjectionEngine::new(ProjectionConfig::new(250.0).with_max_steps(2));

        let mut run = engine.start(&streams, start());
        assert_eq!(run.status(), RunStatus::Running);
        assert_eq!(run.advance(1), RunStatus::Running);
        assert_eq!(run.advance(10), RunStatus::CapReached);
        assert_eq!(run.step_count(), 2);
        assert_eq!(run.state().per_stream_balance, vec![200.0]);
    }

    #[test]
    fn test_definitions_are_not_mutated() {
        let streams = vec![StreamDefinition::income("pay", 100.0, Frequency::Weekly).with_tax(10.0)];
        let before = streams.clone();
        let _ = project(1000.0, &streams, start());
        assert_eq!(streams, before);
    }
}
