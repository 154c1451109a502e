//! In-memory storage for Tally.
//!
//! Reference implementation of the store traits from `tally-core`, backed by
//! `tokio::sync::RwLock`. Single-writer semantics match the core's
//! concurrency model; the budget store owns the authoritative
//! active-uniqueness constraint. Used by the integration test suite and by
//! embedders that do not need durable storage.

pub mod memory;

pub use memory::{MemoryBudgetStore, MemoryLedgerStore, MemoryRuleStore};
