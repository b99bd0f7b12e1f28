//! Payment frequencies and their conversion to a weekly fraction
//!
//! Every stream is stepped one week at a time, so each frequency is reduced to
//! the share of a nominal payment that lands in a single week.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weeks in a projection year (a year is treated as exactly 52 weeks)
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Months in a projection year
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Payment cadence of a stream, or of the interest applied to its balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Frequency {
    Weekly,
    Fortnightly,
    Monthly,
    Yearly,
    /// Token that matched none of the known cadences; contributes nothing
    Unrecognized,
}

impl Frequency {
    /// All cadences that carry a non-zero weekly factor
    pub const KNOWN: [Frequency; 4] = [
        Frequency::Weekly,
        Frequency::Fortnightly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// Share of one nominal payment that falls in a single week
    pub fn weekly_factor(self) -> f64 {
        match self {
            Frequency::Weekly => 1.0,
            Frequency::Fortnightly => 0.5,
            Frequency::Monthly => MONTHS_PER_YEAR / WEEKS_PER_YEAR, // ≈ 0.230769
            Frequency::Yearly => 1.0 / WEEKS_PER_YEAR,              // ≈ 0.019231
            Frequency::Unrecognized => 0.0,
        }
    }

    pub fn is_recognized(self) -> bool {
        self != Frequency::Unrecognized
    }

    /// Lowercase token used in CSV and JSON documents
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Fortnightly => "fortnightly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Unrecognized => "unrecognized",
        }
    }

    /// Case-insensitive parse. Unknown tokens become `Unrecognized` instead of failing.
    pub fn parse_lenient(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "fortnightly" => Frequency::Fortnightly,
            "monthly" => Frequency::Monthly,
            "yearly" => Frequency::Yearly,
            other => {
                log::warn!("unrecognized frequency {:?}; treating as zero contribution", other);
                Frequency::Unrecognized
            }
        }
    }
}

impl Default for Frequency {
    /// New input rows start out fortnightly
    fn default() -> Self {
        Frequency::Fortnightly
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Frequency::parse_lenient(s))
    }
}

impl From<&str> for Frequency {
    fn from(token: &str) -> Self {
        Frequency::parse_lenient(token)
    }
}

impl From<String> for Frequency {
    fn from(token: String) -> Self {
        Frequency::parse_lenient(&token)
    }
}

/// Weekly fraction for a raw frequency token
///
/// Total over all inputs: unknown tokens map to 0.0.
pub fn normalize_to_weekly(token: &str) -> f64 {
    Frequency::parse_lenient(token).weekly_factor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weekly_factors() {
        assert_eq!(normalize_to_weekly("weekly"), 1.0);
        assert_eq!(normalize_to_weekly("fortnightly"), 0.5);
        assert_relative_eq!(normalize_to_weekly("monthly"), 12.0 / 52.0);
        assert_relative_eq!(normalize_to_weekly("yearly"), 1.0 / 52.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(normalize_to_weekly("WEEKLY"), 1.0);
        assert_eq!(normalize_to_weekly("Fortnightly"), 0.5);
        assert_relative_eq!(normalize_to_weekly("  mOnThLy "), 12.0 / 52.0);
    }

    #[test]
    fn test_unknown_is_zero() {
        assert_eq!(normalize_to_weekly("daily"), 0.0);
        assert_eq!(normalize_to_weekly(""), 0.0);
        assert_eq!(Frequency::from("quarterly"), Frequency::Unrecognized);
        assert!(!Frequency::Unrecognized.is_recognized());
    }

    #[test]
    fn test_serde_tokens() {
        let parsed: Vec<Frequency> =
            serde_json::from_str(r#"["Weekly", "yearly", "bimonthly"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Frequency::Weekly, Frequency::Yearly, Frequency::Unrecognized]
        );
        assert_eq!(serde_json::to_string(&Frequency::Monthly).unwrap(), r#""monthly""#);
    }

    #[test]
    fn test_known_round_trip_through_as_str() {
        for freq in Frequency::KNOWN {
            assert_eq!(Frequency::parse_lenient(freq.as_str()), freq);
        }
    }
}
