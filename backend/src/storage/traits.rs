//! # Storage Traits
//!
//! Abstractions over where the record store is snapshotted, so the domain
//! services never know whether state is written to disk or kept in memory.

use anyhow::Result;

use crate::storage::record_store::{Collection, RecordStore};

/// Persistence collaborator, invoked after each successful mutation.
///
/// Implementations serialize the `changed` collections of `store`. A failure
/// is logged by the caller and never undoes the mutation.
pub trait PersistenceHook: Send + Sync {
    fn persist(&self, store: &RecordStore, changed: &[Collection]) -> Result<()>;
}

/// Loads the initial record store when the process starts
pub trait SnapshotSource {
    /// Whether any collection was ever written
    fn has_snapshot(&self) -> bool;

    /// Read every collection. With no snapshot at all and `seed_missing` set,
    /// the seed dataset is returned instead; otherwise missing keys are empty.
    fn load(&self, seed_missing: bool) -> Result<RecordStore>;
}

/// Hook for stores that live only in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

impl PersistenceHook for NoopPersistence {
    fn persist(&self, _store: &RecordStore, _changed: &[Collection]) -> Result<()> {
        Ok(())
    }
}
