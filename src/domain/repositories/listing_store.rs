//! Transactional store traits for the country listing.

use crate::domain::entities::{Country, CountryFields, NewCountry, Region, TopLevelDomain};
use crate::error::AppError;
use async_trait::async_trait;

/// Entry point to the store: opens transactions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgListingStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryListingStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Opens a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn begin(&self) -> Result<Box<dyn ListingTransaction>, AppError>;
}

/// Unit of work over regions, top-level domains and countries.
///
/// Nothing written through a transaction is visible to other readers until
/// [`ListingTransaction::commit`] succeeds. A transaction that is rolled back,
/// or dropped without being committed, leaves the store untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingTransaction: Send {
    /// Lists every persisted region.
    async fn list_regions(&mut self) -> Result<Vec<Region>, AppError>;

    /// Inserts a region.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name already exists.
    async fn create_region(&mut self, name: &str) -> Result<Region, AppError>;

    /// Deletes regions by name, cascading to their countries.
    ///
    /// Returns the number of rows removed.
    async fn delete_regions(&mut self, names: &[String]) -> Result<u64, AppError>;

    /// Lists every persisted top-level domain.
    async fn list_top_level_domains(&mut self) -> Result<Vec<TopLevelDomain>, AppError>;

    /// Inserts a top-level domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name already exists.
    async fn create_top_level_domain(&mut self, name: &str) -> Result<TopLevelDomain, AppError>;

    /// Deletes top-level domains by name, dropping their country links.
    async fn delete_top_level_domains(&mut self, names: &[String]) -> Result<u64, AppError>;

    /// Lists every persisted country.
    async fn list_countries(&mut self) -> Result<Vec<Country>, AppError>;

    /// Inserts a country.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on duplicate names or an unknown region.
    async fn create_country(&mut self, new_country: NewCountry) -> Result<Country, AppError>;

    /// Overwrites the mutable attributes of an existing country.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the country does not exist.
    async fn update_country(&mut self, id: i64, fields: CountryFields)
    -> Result<Country, AppError>;

    /// Removes every top-level domain link of a country.
    async fn clear_country_domains(&mut self, country_id: i64) -> Result<(), AppError>;

    /// Links a country to a top-level domain.
    async fn add_country_domain(
        &mut self,
        country_id: i64,
        top_level_domain_id: i64,
    ) -> Result<(), AppError>;

    /// Lists the top-level domain names linked to a country, sorted.
    async fn country_domains(&mut self, country_id: i64) -> Result<Vec<String>, AppError>;

    /// Deletes countries by name.
    async fn delete_countries(&mut self, names: &[String]) -> Result<u64, AppError>;

    /// Makes every change visible atomically.
    async fn commit(&mut self) -> Result<(), AppError>;

    /// Discards every change.
    async fn rollback(&mut self) -> Result<(), AppError>;
}
