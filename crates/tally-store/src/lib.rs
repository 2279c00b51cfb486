#![forbid(unsafe_code)]

//! SQLite-backed storage for Tally budget documents.
//!
//! The store persists whole documents as JSON payloads keyed by document id
//! and, at save time, indexes every *leaf* line into a `cost_records` table
//! so past unit costs can be suggested for new entries. The store never
//! recomputes anything: callers hand it the already-recalculated document
//! (derived fields populated), per the engine's contract.

mod schema;
mod store;

pub use store::{DocumentMeta, Store, StoreError};

pub use tally_model::CostRecord;
