//! Stream definition structures

use crate::error::LoadError;
use crate::frequency::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a stream's cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StreamKind {
    Income,
    Expense,
}

impl StreamKind {
    /// +1 for money coming in, -1 for money going out
    pub fn sign(self) -> f64 {
        match self {
            StreamKind::Income => 1.0,
            StreamKind::Expense => -1.0,
        }
    }

    /// Prefix for positional labels ("Income 1", "Expense 2")
    pub fn display_name(self) -> &'static str {
        match self {
            StreamKind::Income => "Income",
            StreamKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for StreamKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(StreamKind::Income),
            "expense" => Ok(StreamKind::Expense),
            _ => Err(LoadError::UnknownKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for StreamKind {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One recurring income or expense
///
/// Built by the caller before a run and treated as an immutable snapshot by
/// the engine. `id` is only used by callers to address entries; it plays no
/// part in the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDefinition {
    pub id: String,

    /// Display name; blank falls back to "Income {n}" / "Expense {n}"
    #[serde(default)]
    pub label: String,

    pub kind: StreamKind,

    /// Magnitude of one nominal payment (non-negative)
    pub amount: f64,

    #[serde(default)]
    pub frequency: Frequency,

    #[serde(default)]
    pub apply_tax: bool,

    /// Percentage withheld when `apply_tax` is set (0 to 100)
    #[serde(default)]
    pub tax_rate_percent: f64,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Rate compounded onto the running balance, as a percentage per `interest_frequency`
    #[serde(default)]
    pub interest_rate_percent: f64,

    #[serde(default = "default_interest_frequency")]
    pub interest_frequency: Frequency,
}

fn default_active() -> bool { true }
fn default_interest_frequency() -> Frequency { Frequency::Yearly }

impl StreamDefinition {
    /// Active, untaxed, interest-free stream
    pub fn new(id: impl Into<String>, kind: StreamKind, amount: f64, frequency: Frequency) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            kind,
            amount,
            frequency,
            apply_tax: false,
            tax_rate_percent: 0.0,
            is_active: true,
            interest_rate_percent: 0.0,
            interest_frequency: Frequency::Yearly,
        }
    }

    pub fn income(id: impl Into<String>, amount: f64, frequency: Frequency) -> Self {
        Self::new(id, StreamKind::Income, amount, frequency)
    }

    pub fn expense(id: impl Into<String>, amount: f64, frequency: Frequency) -> Self {
        Self::new(id, StreamKind::Expense, amount, frequency)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Withhold `rate_percent` of every payment
    pub fn with_tax(mut self, rate_percent: f64) -> Self {
        self.apply_tax = true;
        self.tax_rate_percent = rate_percent;
        self
    }

    /// Compound the stream's balance at `rate_percent` per `frequency`
    pub fn with_interest(mut self, rate_percent: f64, frequency: Frequency) -> Self {
        self.interest_rate_percent = rate_percent;
        self.interest_frequency = frequency;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Fraction of each payment kept after tax
    pub fn tax_multiplier(&self) -> f64 {
        if self.apply_tax {
            1.0 - self.tax_rate_percent / 100.0
        } else {
            1.0
        }
    }

    /// Signed, tax- and frequency-normalized amount added each simulated week
    pub fn weekly_contribution(&self) -> f64 {
        self.amount * self.frequency.weekly_factor() * self.tax_multiplier() * self.kind.sign()
    }

    /// Interest applied to the balance each simulated week, as a fraction
    ///
    /// Applied the same way for both kinds, so a positive rate on an expense
    /// grows the deficit.
    pub fn weekly_interest_rate(&self) -> f64 {
        self.interest_frequency.weekly_factor() * self.interest_rate_percent / 100.0
    }

    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

/// Resolve display labels for `streams`, falling back to positional names
///
/// Positions count every stream of the same kind in input order, active or
/// not, so a label does not shift when a neighbour is toggled off.
pub fn resolve_labels(streams: &[StreamDefinition]) -> Vec<String> {
    let mut incomes = 0usize;
    let mut expenses = 0usize;

    streams
        .iter()
        .map(|stream| {
            let position = match stream.kind {
                StreamKind::Income => {
                    incomes += 1;
                    incomes
                }
                StreamKind::Expense => {
                    expenses += 1;
                    expenses
                }
            };
            if stream.has_label() {
                stream.label.clone()
            } else {
                format!("{} {}", stream.kind.display_name(), position)
            }
        })
        .collect()
}
