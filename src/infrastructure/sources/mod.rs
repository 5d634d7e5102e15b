//! Country dataset sources.
//!
//! - [`HttpCountrySource`] - HTTP GET of the published JSON document
//! - [`FileCountrySource`] - Local JSON file with the same shape

pub mod file_source;
pub mod http_source;

pub use file_source::FileCountrySource;
pub use http_source::{DEFAULT_SOURCE_URL, HttpCountrySource};
