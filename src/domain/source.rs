//! Source of the published country dataset.

use crate::domain::entities::CountryRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Retrieves the raw country records.
///
/// # Implementations
///
/// - [`crate::infrastructure::sources::HttpCountrySource`] - HTTP GET of the published JSON
/// - [`crate::infrastructure::sources::FileCountrySource`] - Local JSON file
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetches every record of the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] if the dataset cannot be retrieved or
    /// decoded.
    async fn fetch(&self) -> Result<Vec<CountryRecord>, AppError>;

    /// Human-readable location of the dataset, used in logs.
    fn describe(&self) -> String;
}
