//! # Education Center Backend
//!
//! Attendance, ledger and roster logic for an education center, exposed over
//! a JSON REST API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, DTO mappers)
//!     ↓
//! Domain Layer (services, commands, models)
//!     ↓
//! Storage Layer (record store, persistence hook, JSON snapshots)
//! ```
//!
//! The record store is owned by the process through a `StoreHandle` that every
//! service shares. Each mutation runs in one critical section and then hands
//! the changed collections to the persistence hook.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::commands::roster::AlertThresholds;
use crate::domain::{
    AttendanceService, FallbackInsight, InsightProvider, LedgerService, ReconciliationService,
    RosterService, RosterView,
};
use crate::storage::{JsonConnection, JsonSnapshotRepository, SnapshotSource, StoreHandle};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub attendance_service: AttendanceService,
    pub ledger_service: LedgerService,
    pub roster_view: RosterView,
    pub roster_service: RosterService,
    pub reconciliation_service: ReconciliationService,
    pub insight_provider: Arc<dyn InsightProvider>,
}

/// Wire every service to the same store
pub fn build_state(
    store: StoreHandle,
    thresholds: AlertThresholds,
    insight_provider: Arc<dyn InsightProvider>,
) -> AppState {
    AppState {
        attendance_service: AttendanceService::new(store.clone()),
        ledger_service: LedgerService::new(store.clone(), thresholds.high_debt),
        roster_view: RosterView::new(store.clone(), thresholds),
        roster_service: RosterService::new(store.clone()),
        reconciliation_service: ReconciliationService::new(store.clone()),
        insight_provider,
        store,
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_directory.display());
    let connection = JsonConnection::new(&config.data_directory)?;
    let repository = JsonSnapshotRepository::new(connection);
    let first_run = !repository.has_snapshot();
    let store = repository.load(config.seed_on_first_run)?;
    if first_run && config.seed_on_first_run {
        info!("First run, writing seed dataset");
        repository.write_all(&store)?;
    }

    info!("Setting up application state");
    let store = StoreHandle::new(store, Arc::new(repository));
    let thresholds = AlertThresholds {
        high_debt: config.high_debt_threshold,
        low_attendance: config.low_attendance_threshold,
    };
    Ok(build_state(store, thresholds, Arc::new(FallbackInsight)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/students", get(io::list_students).post(io::create_student))
        .route("/students/:id", put(io::update_student).delete(io::delete_student))
        .route("/students/:id/recompute", post(io::recompute_student))
        .route("/groups", get(io::list_groups).post(io::create_group))
        .route("/groups/occupancy", get(io::list_occupancy))
        .route("/groups/:id", put(io::update_group).delete(io::delete_group))
        .route("/groups/:id/occupancy", get(io::get_occupancy))
        .route("/attendance", get(io::list_attendance).post(io::mark_attendance))
        .route("/attendance/quick", post(io::quick_admit))
        .route("/attendance/summary", get(io::attendance_summary))
        .route("/transactions", get(io::list_transactions).post(io::record_transaction))
        .route("/finances/summary", get(io::financial_summary))
        .route("/dashboard", get(io::dashboard))
        .route("/audit", get(io::audit))
        .route("/insight", get(io::insight))
        .route("/reset", post(io::reset_center));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::ledger::RecordTransactionCommand;
    use crate::domain::models::transaction::TransactionKind;
    use crate::storage::Collection;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            data_directory: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_first_run_writes_seed_dataset() {
        let dir = tempdir().unwrap();
        let state = initialize_backend(&config_in(dir.path())).unwrap();

        assert_eq!(state.store.read(|s| s.students().len()), 3);
        for collection in Collection::ALL {
            assert!(dir.path().join(format!("{}.json", collection.storage_key())).exists());
        }
    }

    #[test]
    fn test_mutations_survive_restart() {
        let dir = tempdir().unwrap();
        let state = initialize_backend(&config_in(dir.path())).unwrap();
        state
            .ledger_service
            .record_transaction(RecordTransactionCommand {
                student_id: "s2".to_string(),
                amount: 150,
                kind: TransactionKind::Payment,
                note: String::new(),
                date: None,
            })
            .unwrap();
        drop(state);

        let restarted = initialize_backend(&config_in(dir.path())).unwrap();
        assert_eq!(restarted.store.read(|s| s.student("s2").unwrap().balance), 0);
        assert_eq!(restarted.store.read(|s| s.transactions().len()), 2);
        assert!(restarted.reconciliation_service.audit().drifts.is_empty());
    }

    #[test]
    fn test_without_seeding_starts_empty() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            seed_on_first_run: false,
            ..config_in(dir.path())
        };
        let state = initialize_backend(&config).unwrap();
        assert!(state.store.read(|s| s.students().is_empty()));
        assert!(!dir.path().join("ecp_students.json").exists());
    }

    #[test]
    fn test_reset_is_written_through() {
        let dir = tempdir().unwrap();
        let state = initialize_backend(&config_in(dir.path())).unwrap();
        state.roster_service.reset_center(false).unwrap();
        drop(state);

        // Every key still exists, so the restart does not reseed
        let restarted = initialize_backend(&config_in(dir.path())).unwrap();
        assert!(restarted.store.read(|s| s.students().is_empty()));
        assert!(restarted.store.read(|s| s.transactions().is_empty()));

        restarted.roster_service.reset_center(true).unwrap();
        drop(restarted);
        let reseeded = initialize_backend(&config_in(dir.path())).unwrap();
        assert_eq!(reseeded.store.read(|s| s.students().len()), 3);
        assert_eq!(reseeded.store.read(|s| s.transactions().len()), 1);
    }
}
