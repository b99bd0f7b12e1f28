//! Caller-side checks run before handing streams to the engine
//!
//! The engine does not sanitize its inputs (a NaN amount simply propagates),
//! so every surface that accepts external input runs these first.

use super::StreamDefinition;
use crate::error::ValidationError;
use std::collections::HashSet;

/// Longest label accepted for a stream
pub const MAX_LABEL_LEN: usize = 100;

/// Check a goal and its streams; the first broken rule is returned
pub fn validate_request(goal: f64, streams: &[StreamDefinition]) -> Result<(), ValidationError> {
    validate_goal(goal)?;

    if streams.is_empty() {
        return Err(ValidationError::NoStreams);
    }

    let mut seen_ids = HashSet::with_capacity(streams.len());
    for (idx, stream) in streams.iter().enumerate() {
        let position = idx + 1;
        validate_stream(position, stream)?;

        if !seen_ids.insert(stream.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                position,
                id: stream.id.clone(),
            });
        }
    }

    Ok(())
}

pub fn validate_goal(goal: f64) -> Result<(), ValidationError> {
    if goal.is_finite() && goal >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidGoal(goal))
    }
}

/// Check a single stream; `position` is 1-based and only used in messages
pub fn validate_stream(position: usize, stream: &StreamDefinition) -> Result<(), ValidationError> {
    let id = || stream.id.clone();

    if stream.label.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::LabelTooLong { position, id: id(), max: MAX_LABEL_LEN });
    }

    if !stream.amount.is_finite() || stream.amount < 0.0 {
        return Err(ValidationError::InvalidAmount { position, id: id(), value: stream.amount });
    }

    // Tax rate is checked even when tax is off so a later toggle can't expose a bad value
    let tax = stream.tax_rate_percent;
    if !tax.is_finite() || !(0.0..=100.0).contains(&tax) {
        return Err(ValidationError::InvalidTaxRate { position, id: id(), value: tax });
    }

    if !stream.interest_rate_percent.is_finite() {
        return Err(ValidationError::InvalidInterestRate {
            position,
            id: id(),
            value: stream.interest_rate_percent,
        });
    }

    Ok(())
}
