//! Store implementations.
//!
//! PostgreSQL stores use SQLx runtime queries; the in-memory store mirrors
//! the same relational rules without a database.
//!
//! # Stores
//!
//! - [`PgListingStore`] - Transactional reads and writes for the reconciler
//! - [`PgReportRepository`] - Regional aggregation queries
//! - [`MemoryListingStore`] - In-memory store implementing both traits

pub mod memory_store;
pub mod pg_listing_store;
pub mod pg_report_repository;

pub use memory_store::MemoryListingStore;
pub use pg_listing_store::PgListingStore;
pub use pg_report_repository::PgReportRepository;
