//! Income/expense ledger entries and the ledger store boundary.
//!
//! The ledger itself is append-mostly external state; this module owns the
//! entry types, the query filter, and the store trait both engines consume.

pub mod store;
pub mod types;

pub use store::LedgerStore;
pub use types::{EntryFilter, LedgerEntry, NewLedgerEntry};
