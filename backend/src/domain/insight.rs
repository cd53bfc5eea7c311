//! Text-insight collaborator.
//!
//! Providers receive a compact snapshot of the roster and return free text
//! that is shown as-is and never parsed.

use serde::Serialize;
use tracing::info;

use crate::storage::StoreHandle;

/// Shown when no insight provider is configured or the provider is unreachable
pub const FALLBACK_INSIGHT: &str =
    "Insights are unavailable right now. Review attendance rates and outstanding balances manually.";

/// Per-student figures handed to an insight provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSnapshot {
    pub id: String,
    pub name: String,
    pub balance: i64,
    pub attendance_rate: Option<u8>,
}

pub trait InsightProvider: Send + Sync {
    fn insight(&self, snapshot: &[StudentSnapshot]) -> String;
}

/// Provider that always answers with [`FALLBACK_INSIGHT`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackInsight;

impl InsightProvider for FallbackInsight {
    fn insight(&self, _snapshot: &[StudentSnapshot]) -> String {
        FALLBACK_INSIGHT.to_string()
    }
}

/// Snapshot of every student currently on the roster
pub fn student_snapshot(store: &StoreHandle) -> Vec<StudentSnapshot> {
    let snapshot: Vec<StudentSnapshot> = store.read(|store| {
        store
            .students()
            .iter()
            .map(|s| StudentSnapshot {
                id: s.id.clone(),
                name: s.name.clone(),
                balance: s.balance,
                attendance_rate: s.attendance_rate,
            })
            .collect()
    });
    info!("Prepared insight snapshot of {} students", snapshot.len());
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::seed_store;

    #[test]
    fn test_snapshot_carries_only_summary_fields() {
        let store = StoreHandle::in_memory(seed_store());
        let snapshot = student_snapshot(&store);
        assert_eq!(snapshot.len(), 3);

        let sara = snapshot.iter().find(|s| s.id == "s2").unwrap();
        assert_eq!(sara.balance, 150);
        assert_eq!(sara.attendance_rate, None);
    }

    #[test]
    fn test_fallback_ignores_snapshot() {
        assert_eq!(FallbackInsight.insight(&[]), FALLBACK_INSIGHT);
    }
}
