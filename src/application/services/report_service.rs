//! Regional statistics service.

use std::sync::Arc;

use crate::domain::repositories::{RegionStats, ReportRepository};
use crate::error::AppError;

/// Service for the per-region country report.
///
/// Regions without countries are included with a zero count and no
/// population total.
pub struct ReportService<R: ReportRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ReportRepository + ?Sized> ReportService<R> {
    /// Creates a new report service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Aggregates every region, ordered by name in code point order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn region_report(&self) -> Result<Vec<RegionStats>, AppError> {
        self.repository.region_stats().await
    }

    /// Returns true if the backing store answers queries.
    pub async fn is_ready(&self) -> bool {
        self.repository.ping().await
    }
}
