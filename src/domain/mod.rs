//! Domain layer containing business entities and reconciliation rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Store and query trait definitions
//! - [`diff`] - Set-difference diff engine
//! - [`effect`] - Effects logged by a reconciliation run
//! - [`source`] - Country dataset source trait
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Reconciliation Flow
//!
//! 1. A [`source::CountrySource`] yields [`entities::CountryRecord`]s
//! 2. [`diff`] compares them with the persisted entity sets
//! 3. The reconcile service applies the diff inside one
//!    [`repositories::ListingTransaction`]
//! 4. Every applied change is reported as an [`effect::Effect`]

pub mod diff;
pub mod effect;
pub mod entities;
pub mod repositories;
pub mod source;
