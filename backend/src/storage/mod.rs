//! # Storage Module
//!
//! Holds the record store and the mechanisms that snapshot it.
//!
//! ## Key Responsibilities
//!
//! - **Record Store**: ordered in-memory collections shared through `StoreHandle`
//! - **Persistence Hook**: collaborator notified after every mutation
//! - **JSON Snapshots**: one file per collection key, loaded on startup
//! - **Seed Data**: initial roster used when a collection was never written

pub mod json;
pub mod record_store;
pub mod seed;
pub mod traits;

pub use json::{JsonConnection, JsonSnapshotRepository};
pub use record_store::{Collection, RecordStore, StoreHandle};
pub use traits::{NoopPersistence, PersistenceHook, SnapshotSource};
