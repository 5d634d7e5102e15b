//! Core domain entities representing the country listing data model.
//!
//! Entities are plain data structures; persistence details live in
//! `crate::infrastructure::persistence`.
//!
//! # Entity Types
//!
//! - [`Region`] - Geographic grouping, keyed by name
//! - [`TopLevelDomain`] - Domain suffix, many-to-many with countries
//! - [`Country`] - A country with codes, population and capital
//! - [`CountryRecord`] - One incoming record of the published dataset
//!
//! # Design Pattern
//!
//! Writes use separate input structs: [`NewRegion`], [`NewTopLevelDomain`]
//! and [`NewCountry`] for inserts, [`CountryFields`] for the attributes
//! overwritten on every run. Their length limits match the column widths.

pub mod country;
pub mod country_record;
pub mod region;
pub mod top_level_domain;

pub use country::{Country, CountryFields, NewCountry};
pub use country_record::CountryRecord;
pub use region::{NewRegion, Region};
pub use top_level_domain::{NewTopLevelDomain, TopLevelDomain};
