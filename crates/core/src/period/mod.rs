//! Period boundary and due-date calculations.
//!
//! Pure, stateless date math shared by both engines:
//! - Monthly and weekly period boundaries
//! - Recurrence due-date stepping
//! - Due/reminder window checks

pub mod calc;
pub mod error;
pub mod types;


pub use calc::{is_due, is_reminder_due, iso_week_number, month_range, next_due_date, week_range};
pub use error::PeriodError;
pub use types::{BudgetKind, BudgetPeriod, DateRange, Frequency};
