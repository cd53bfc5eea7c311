//! # JSON Storage Module
//!
//! File-based key-value persistence for the record store. Each collection is
//! serialized as one JSON array under a fixed key:
//!
//! ```text
//! data/
//! ├── ecp_students.json
//! ├── ecp_groups.json
//! ├── ecp_attendance.json
//! └── ecp_transactions.json
//! ```
//!
//! Writes go to a temporary file first and are renamed into place, so a crash
//! never leaves a half-written collection behind.

pub mod connection;
pub mod snapshot_repository;

pub use connection::JsonConnection;
pub use snapshot_repository::JsonSnapshotRepository;
