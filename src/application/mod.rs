//! Application layer services implementing business logic.
//!
//! Services consume the repository and source traits from
//! [`crate::domain`] and expose the operations used by the HTTP server and
//! the admin CLI.
//!
//! # Available Services
//!
//! - [`services::reconcile_service::ReconcileService`] - Applies the published dataset to the store
//! - [`services::report_service::ReportService`] - Per-region country counts and population totals

pub mod services;
