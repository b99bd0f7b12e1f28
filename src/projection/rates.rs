//! Per-stream weekly rates, fixed for the length of a run

use crate::stream::StreamDefinition;

/// Weekly contribution and interest for one active stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamRates {
    /// Signed amount added to the balance each week, before interest
    pub weekly_contribution: f64,
    /// Fraction compounded onto the balance each week
    pub weekly_interest_rate: f64,
}

impl StreamRates {
    pub fn from_definition(stream: &StreamDefinition) -> Self {
        Self {
            weekly_contribution: stream.weekly_contribution(),
            weekly_interest_rate: stream.weekly_interest_rate(),
        }
    }

    /// Balance after one week: contribution first, then interest on the total
    #[inline]
    pub fn step(&self, balance: f64) -> f64 {
        (balance + self.weekly_contribution) * (1.0 + self.weekly_interest_rate)
    }
}
