//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services.
//!
//! Handlers translate JSON requests into domain commands, call the services
//! held in `AppState`, and map results and `DomainError`s back into DTOs and
//! status codes.

pub mod rest;

pub use rest::*;
