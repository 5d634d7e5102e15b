//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; concrete stores live in
//! `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`ListingStore`] / [`ListingTransaction`] - Transactional reads and writes used by the reconciler
//! - [`ReportRepository`] - Read-only regional aggregation
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests; see
//! `tests/repository_*.rs` for PostgreSQL integration tests.

pub mod listing_store;
pub mod report_repository;

pub use listing_store::{ListingStore, ListingTransaction};
pub use report_repository::{RegionStats, ReportRepository};

#[cfg(test)]
pub use listing_store::{MockListingStore, MockListingTransaction};
#[cfg(test)]
pub use report_repository::MockReportRepository;
