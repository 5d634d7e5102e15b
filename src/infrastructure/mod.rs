//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory stores
//! - [`sources`] - HTTP and file sources of the country dataset

pub mod persistence;
pub mod sources;
