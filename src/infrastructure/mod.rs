//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching and geolocation.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache backends (Redis, moka, no-op)
//! - [`geo`] - IP geolocation adapters
//! - [`persistence`] - PostgreSQL and in-memory stores

pub mod cache;
pub mod geo;
pub mod persistence;
