//! Read-only aggregation over regions and their countries.

use crate::error::AppError;
use async_trait::async_trait;

/// Country count and population total for one region.
///
/// `total_population` is `None` for a region without countries, matching
/// SQL `SUM` over an empty group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionStats {
    pub name: String,
    pub number_countries: i64,
    pub total_population: Option<i64>,
}

/// Repository interface for the regional report.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReportRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryListingStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Aggregates every region, ordered by name in code point order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn region_stats(&self) -> Result<Vec<RegionStats>, AppError>;

    /// Returns true if the backing store answers queries.
    async fn ping(&self) -> bool;
}
