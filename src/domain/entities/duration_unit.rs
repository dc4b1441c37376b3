//! Units accepted for link lifetimes.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Unit of `duration_value` in a shorten request.
///
/// Months and years are fixed-length (30 and 365 days); no calendar arithmetic
/// is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    #[default]
    Hours,
    Days,
    Months,
    Years,
}

/// Raised when a unit string does not name a [`DurationUnit`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unsupported duration unit: {0}")]
pub struct UnsupportedDurationUnit(pub String);

impl DurationUnit {
    /// Converts `value` units into a duration, or `None` on overflow.
    pub fn to_duration(self, value: i64) -> Option<Duration> {
        match self {
            Self::Minutes => Duration::try_minutes(value),
            Self::Hours => Duration::try_hours(value),
            Self::Days => Duration::try_days(value),
            Self::Months => value.checked_mul(30).and_then(Duration::try_days),
            Self::Years => value.checked_mul(365).and_then(Duration::try_days),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = UnsupportedDurationUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            "months" => Ok(Self::Months),
            "years" => Ok(Self::Years),
            _ => Err(UnsupportedDurationUnit(s.to_string())),
        }
    }
}
