//! Repository trait definitions for the domain layer.
//!
//! These traits are the boundary to durable storage. Implementations live in
//! `crate::infrastructure::persistence`; mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`DestinationStore`] - alias lookup and atomic creation
//! - [`EventStore`] - click event append and windowed queries

pub mod destination_store;
pub mod event_store;

pub use destination_store::DestinationStore;
pub use event_store::EventStore;

#[cfg(test)]
pub use destination_store::MockDestinationStore;
#[cfg(test)]
pub use event_store::MockEventStore;
