//! Durable store implementations.
//!
//! # Stores
//!
//! - [`PgDestinationStore`] / [`PgEventStore`] - PostgreSQL via SQLx
//! - [`MemoryDestinationStore`] / [`MemoryEventStore`] - in-process DashMap stores

pub mod memory;
pub mod pg_destination_store;
pub mod pg_event_store;

pub use memory::{MemoryDestinationStore, MemoryEventStore};
pub use pg_destination_store::PgDestinationStore;
pub use pg_event_store::PgEventStore;
