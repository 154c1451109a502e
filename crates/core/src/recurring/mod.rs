//! Recurring rules and the generation engine.
//!
//! This module implements the recurrence scheduler:
//! - Rule CRUD with due-date re-anchoring on edits
//! - The generation cycle that turns due rules into ledger entries exactly
//!   once per occurrence
//! - Upcoming-payment listing and per-rule generation history
//! - The reminder scan feeding notification collaborators

pub mod error;
pub mod service;
pub mod store;
pub mod types;


pub use error::RecurringError;
pub use service::RecurringService;
pub use store::RecurringRuleStore;
pub use types::{
    CreateRuleInput, CycleOutcome, RecurringRule, Reminder, RuleHistory, UpdateRulePatch,
};
