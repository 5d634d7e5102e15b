//! Business logic services for the application layer.

pub mod reconcile_service;
pub mod report_service;

pub use reconcile_service::{ReconcileOptions, ReconcileReport, ReconcileService};
pub use report_service::ReportService;
