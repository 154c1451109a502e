//! Period and frequency types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calc::{month_range, week_range};
use super::error::PeriodError;

/// Recurrence cadence for a recurring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every calendar month (end-of-month clamped).
    Monthly,
    /// Every calendar year (Feb 29 clamped).
    Yearly,
}

impl Frequency {
    /// Returns the wire-format name of the frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(PeriodError::InvalidFrequency(other.to_string())),
        }
    }
}

/// Budget period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    /// Calendar-month budget.
    Monthly,
    /// Custom-week budget (first-Monday scheme).
    Weekly,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => f.write_str("monthly"),
            Self::Weekly => f.write_str("weekly"),
        }
    }
}

/// The period a budget covers, as a tagged union.
///
/// Making the period a sum type keeps resolution exhaustive: a monthly budget
/// cannot exist without its month, a weekly one without its week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// A specific calendar month.
    Monthly {
        /// 1-indexed month.
        month: u32,
        /// Calendar year.
        year: i32,
    },
    /// A specific week in the custom first-Monday numbering.
    Weekly {
        /// 1-indexed week.
        week: u32,
        /// Calendar year.
        year: i32,
    },
}

impl BudgetPeriod {
    /// Returns the period classification.
    #[must_use]
    pub const fn kind(&self) -> BudgetKind {
        match self {
            Self::Monthly { .. } => BudgetKind::Monthly,
            Self::Weekly { .. } => BudgetKind::Weekly,
        }
    }

    /// Returns the calendar year of the period.
    #[must_use]
    pub const fn year(&self) -> i32 {
        match self {
            Self::Monthly { year, .. } | Self::Weekly { year, .. } => *year,
        }
    }

    /// Validates the period fields against their contracts.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` or `PeriodError::InvalidWeek` for
    /// out-of-range fields.
    pub fn validate(&self) -> Result<(), PeriodError> {
        match *self {
            Self::Monthly { month, .. } if !(1..=12).contains(&month) => {
                Err(PeriodError::InvalidMonth(month))
            }
            Self::Weekly { week, .. } if !(1..=53).contains(&week) => {
                Err(PeriodError::InvalidWeek(week))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the inclusive datetime bounds of the period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` for out-of-range month/week values.
    pub fn bounds(&self) -> Result<DateRange, PeriodError> {
        let (start, end) = match *self {
            Self::Monthly { month, year } => month_range(year, month)?,
            Self::Weekly { week, year } => week_range(year, week)?,
        };
        Ok(DateRange { start, end })
    }

    /// Human-readable period label, e.g. `"3/2025"` or `"Week 12, 2025"`.
    #[must_use]
    pub fn label(&self) -> String {
        match *self {
            Self::Monthly { month, year } => format!("{month}/{year}"),
            Self::Weekly { week, year } => format!("Week {week}, {year}"),
        }
    }
}

/// An inclusive range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First instant of the range.
    pub start: DateTime<Utc>,
    /// Last instant of the range.
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range from two instants.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns true if the instant falls within the range, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}
