//! # Domain Module
//!
//! Contains the business logic of the education center: attendance, the
//! per-student ledger, and read-side views over the roster.
//!
//! ## Module Organization
//!
//! - **attendance_service**: one record per student, group and day; derived attendance rate
//! - **ledger_service**: payments and debts, clamped balance, debtor/active status
//! - **roster_view**: search, occupancy and dashboard projections
//! - **roster_service**: student and group management
//! - **reconciliation_service**: rebuilds and audits cached fields from the logs
//! - **insight**: opaque text-insight collaborator
//!
//! ## Business Rules
//!
//! - A student has at most one attendance record per group per calendar day
//! - Late arrivals count as attended
//! - Balances never drop below zero; overpayments are not carried as credit
//! - A positive balance makes a student a debtor; suspension is set only by roster management
//! - Attendance and transaction logs are append-only

use chrono::{Local, NaiveDate};

pub mod attendance_service;
pub mod commands;
pub mod errors;
pub mod insight;
pub mod ledger_service;
pub mod models;
pub mod reconciliation_service;
pub mod roster_service;
pub mod roster_view;

pub use attendance_service::AttendanceService;
pub use errors::{DomainError, DomainResult};
pub use insight::{FallbackInsight, InsightProvider};
pub use ledger_service::LedgerService;
pub use reconciliation_service::ReconciliationService;
pub use roster_service::RosterService;
pub use roster_view::RosterView;

/// The given day, or the local calendar day when absent
pub fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
