//! Scenario documents and parallel batch projection
//!
//! A scenario bundles a goal, an optional start time and a stream list. Scenarios
//! share nothing, so a batch is projected in parallel and returned in input order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Local, TimeZone, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, ValidationError};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, HARD_CAP};
use crate::stream::{validate_request, StreamDefinition};

/// One projection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,

    /// Savings goal; `validate` rejects a scenario without one
    #[serde(default)]
    pub goal: Option<f64>,

    /// First observation time; the runner's default start is used when absent.
    /// Weeks are still stepped in the runner's time zone.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    #[serde(default)]
    pub streams: Vec<StreamDefinition>,
}

fn default_name() -> String { "scenario".to_string() }
fn default_max_steps() -> usize { HARD_CAP }

impl Scenario {
    pub fn new(name: impl Into<String>, goal: f64, streams: Vec<StreamDefinition>) -> Self {
        Self {
            name: name.into(),
            goal: Some(goal),
            start: None,
            max_steps: HARD_CAP,
            streams,
        }
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Goal used for projection; an unvalidated scenario without one projects nothing
    pub fn goal_or_zero(&self) -> f64 {
        self.goal.unwrap_or(0.0)
    }

    pub fn config(&self) -> ProjectionConfig {
        ProjectionConfig::new(self.goal_or_zero()).with_max_steps(self.max_steps)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let goal = self.goal.ok_or(ValidationError::MissingGoal)?;
        validate_request(goal, &self.streams)
    }

    /// Project this scenario, starting at its own start or `default_start`
    ///
    /// Weeks are stepped on the calendar of `default_start`'s zone.
    pub fn project<Tz: TimeZone>(&self, default_start: DateTime<Tz>) -> ProjectionResult {
        let start = match self.start {
            Some(own) => own.with_timezone(&default_start.timezone()),
            None => default_start,
        };
        ProjectionEngine::new(self.config()).project(&self.streams, start)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioDocument {
    Many(Vec<Scenario>),
    One(Scenario),
}

/// Read one scenario object or an array of them from JSON
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>, LoadError> {
    let document: ScenarioDocument = serde_json::from_reader(reader)?;
    Ok(match document {
        ScenarioDocument::Many(scenarios) => scenarios,
        ScenarioDocument::One(scenario) => vec![scenario],
    })
}

pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, LoadError> {
    let file = File::open(path)?;
    load_scenarios_from_reader(BufReader::new(file))
}

/// Result of one scenario in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub goal: f64,
    /// Derived from the final aggregate; the projection itself carries no such flag
    pub goal_reached: bool,
    pub weeks_elapsed: usize,
    pub final_balance: f64,
    pub result: ProjectionResult,
}

impl ScenarioOutcome {
    fn new(scenario: &Scenario, result: ProjectionResult) -> Self {
        let goal = scenario.goal_or_zero();
        Self {
            name: scenario.name.clone(),
            goal,
            goal_reached: result.reaches(goal),
            weeks_elapsed: result.steps(),
            final_balance: result.final_balance(),
            result,
        }
    }
}

/// Projects batches of scenarios in parallel
///
/// Every scenario is stepped on the calendar of the runner's zone, which is the
/// host's local zone for `starting_now`.
#[derive(Debug, Clone)]
pub struct ScenarioRunner<Tz: TimeZone = Local> {
    default_start: DateTime<Tz>,
}

impl ScenarioRunner<Local> {
    pub fn starting_now() -> Self {
        Self::new(Local::now())
    }
}

impl<Tz: TimeZone> ScenarioRunner<Tz> {
    /// Scenarios without a start of their own begin at `default_start`
    pub fn new(default_start: DateTime<Tz>) -> Self {
        Self { default_start }
    }

    pub fn run(&self, scenario: &Scenario) -> ScenarioOutcome {
        ScenarioOutcome::new(scenario, scenario.project(self.default_start.clone()))
    }

    /// Project every scenario; outcomes come back in input order
    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome>
    where
        Tz::Offset: Sync,
    {
        let started = Instant::now();
        let outcomes: Vec<ScenarioOutcome> = scenarios
            .par_iter()
            .map(|scenario| self.run(scenario))
            .collect();

        log::info!(
            "projected {} scenarios in {:?}",
            outcomes.len(),
            started.elapsed()
        );
        outcomes
    }
}
