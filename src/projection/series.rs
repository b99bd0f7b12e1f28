//! Time-series output of a projection

use crate::stream::StreamKind;
use serde::{Deserialize, Serialize};

/// Label of the aggregate series
pub const AGGREGATE_LABEL: &str = "Total Savings";

/// One balance observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub value: f64,
}

/// Labelled, chronologically ordered balance observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    /// Id of the source stream; `None` for the aggregate
    pub stream_id: Option<String>,
    /// Kind of the source stream; `None` for the aggregate
    pub kind: Option<StreamKind>,
    pub points: Vec<TimeSeriesPoint>,
}

impl Series {
    pub fn is_aggregate(&self) -> bool {
        self.stream_id.is_none()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

/// Aggregate series first, then one series per active stream in input order
///
/// Always holds the aggregate series; deserializing a document without one fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResultDocument")]
pub struct ProjectionResult {
    series: Vec<Series>,
}

#[derive(Deserialize)]
struct ResultDocument {
    series: Vec<Series>,
}

impl TryFrom<ResultDocument> for ProjectionResult {
    type Error = String;

    fn try_from(doc: ResultDocument) -> Result<Self, Self::Error> {
        match doc.series.first() {
            Some(first) if first.is_aggregate() => Ok(Self { series: doc.series }),
            Some(first) => Err(format!("first series {:?} is not the aggregate", first.label)),
            None => Err("projection result has no aggregate series".to_string()),
        }
    }
}

impl ProjectionResult {
    /// `series[0]` must be the aggregate
    pub(crate) fn from_series(series: Vec<Series>) -> Self {
        debug_assert!(series.first().is_some_and(Series::is_aggregate));
        Self { series }
    }

    /// Aggregate followed by the per-stream series
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn into_series(self) -> Vec<Series> {
        self.series
    }

    pub fn aggregate(&self) -> &Series {
        &self.series[0]
    }

    pub fn stream_series(&self) -> &[Series] {
        &self.series[1..]
    }

    /// Look up a stream's series by its id
    pub fn stream(&self, id: &str) -> Option<&Series> {
        self.stream_series()
            .iter()
            .find(|s| s.stream_id.as_deref() == Some(id))
    }

    /// Aggregate balance at the last simulated week
    pub fn final_balance(&self) -> f64 {
        self.aggregate().last_value().unwrap_or(0.0)
    }

    /// Number of simulated weeks (the initial observation is not a step)
    pub fn steps(&self) -> usize {
        self.aggregate().points.len().saturating_sub(1)
    }

    /// Whether the final aggregate reached `goal`
    ///
    /// The result itself carries no goal; callers pass the one they used.
    pub fn reaches(&self, goal: f64) -> bool {
        self.final_balance() >= goal
    }
}
