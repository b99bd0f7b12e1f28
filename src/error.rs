//! Error types for loading, validating and writing projections
//!
//! The projection engine itself never fails; these cover the surfaces around it.

use thiserror::Error;

/// Failure while reading stream definitions or scenario documents
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown stream kind {0:?} (expected \"income\" or \"expense\")")]
    UnknownKind(String),

    #[error("invalid yes/no value {0:?}")]
    InvalidFlag(String),

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<LoadError>,
    },
}

/// Rule broken by a projection request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("a savings goal is required")]
    MissingGoal,

    #[error("savings goal must be a finite, non-negative amount (got {0})")]
    InvalidGoal(f64),

    #[error("at least one stream is required")]
    NoStreams,

    #[error("stream {position} ({id}): label is longer than {max} characters")]
    LabelTooLong { position: usize, id: String, max: usize },

    #[error("stream {position} ({id}): amount must be a finite, non-negative number (got {value})")]
    InvalidAmount { position: usize, id: String, value: f64 },

    #[error("stream {position} ({id}): tax rate must be between 0 and 100 (got {value})")]
    InvalidTaxRate { position: usize, id: String, value: f64 },

    #[error("stream {position} ({id}): interest rate must be finite (got {value})")]
    InvalidInterestRate { position: usize, id: String, value: f64 },

    #[error("stream {position}: duplicate id {id:?}")]
    DuplicateId { position: usize, id: String },
}
