//! Date-range and due-date calculations.
//!
//! All functions operate in UTC. Due/reminder checks truncate to the UTC
//! calendar date so a cycle running at 23:59 and one at 00:01 agree on what
//! is due.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};

use super::error::PeriodError;
use super::types::Frequency;

/// Returns the inclusive bounds of a calendar month.
///
/// Start is the first instant of the month; end is its last second
/// (23:59:59). `month` is 1-indexed.
///
/// # Errors
///
/// Returns `PeriodError::InvalidMonth` for months outside 1-12.
pub fn month_range(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), PeriodError> {
    if !(1..=12).contains(&month) {
        return Err(PeriodError::InvalidMonth(month));
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PeriodError::InvalidDate(format!("{year}-{month:02}-01")))?;
    let next_month = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| PeriodError::InvalidDate(format!("month after {first}")))?;

    let start = first.and_time(NaiveTime::MIN).and_utc();
    let end = next_month.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1);
    Ok((start, end))
}

/// Returns the inclusive bounds of a week in the custom first-Monday scheme.
///
/// Week 1 begins at the first Monday on or after Jan 1 of `year`; each week
/// runs Monday 00:00:00 through Sunday 23:59:59.999. This is intentionally
/// NOT ISO-8601 — stored weekly budgets encode this numbering, so it must be
/// reproduced exactly. See [`iso_week_number`] for the other scheme.
///
/// # Errors
///
/// Returns `PeriodError::InvalidWeek` for week 0.
pub fn week_range(year: i32, week: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), PeriodError> {
    if week == 0 {
        return Err(PeriodError::InvalidWeek(week));
    }

    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| PeriodError::InvalidDate(format!("{year}-01-01")))?;
    let days_to_first_monday = (8 - i64::from(jan1.weekday().num_days_from_sunday())) % 7;
    let first_monday = jan1 + Duration::days(days_to_first_monday);

    let start_date = first_monday + Duration::days(i64::from(week - 1) * 7);
    let start = start_date.and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(7) - Duration::milliseconds(1);
    Ok((start, end))
}

/// Returns the ISO-8601 week number (Thursday-anchored) of a date.
///
/// Used only to default "current week" when a caller does not name one.
/// Deliberately a different algorithm than [`week_range`]; the two can
/// disagree near year boundaries.
#[must_use]
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Steps a due date forward by one occurrence of the given frequency.
///
/// Monthly and yearly steps are calendar-aware: Jan 31 + 1 month lands on the
/// last day of February, Feb 29 + 1 year on Feb 28.
///
/// # Errors
///
/// Returns `PeriodError::InvalidDate` if the step leaves the representable
/// date range.
pub fn next_due_date(
    from: DateTime<Utc>,
    frequency: Frequency,
) -> Result<DateTime<Utc>, PeriodError> {
    let next = match frequency {
        Frequency::Daily => from.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => from.checked_add_signed(Duration::days(7)),
        Frequency::Monthly => from.checked_add_months(Months::new(1)),
        Frequency::Yearly => from.checked_add_months(Months::new(12)),
    };
    next.ok_or_else(|| PeriodError::InvalidDate(format!("{frequency} step from {from}")))
}

/// Returns true if `due` has arrived: its UTC date is on or before `today`.
#[must_use]
pub fn is_due(due: DateTime<Utc>, today: NaiveDate) -> bool {
    due.date_naive() <= today
}

/// Returns true if `due` is inside its reminder window.
///
/// The window opens `reminder_days` days before the due date and closes on
/// the due date itself (exclusive) — once something is due it needs
/// generation, not a reminder.
#[must_use]
pub fn is_reminder_due(due: DateTime<Utc>, today: NaiveDate, reminder_days: i64) -> bool {
    let due_day = due.date_naive();
    due_day - Duration::days(reminder_days) <= today && due_day > today
}
