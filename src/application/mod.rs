//! Application layer services implementing business logic.
//!
//! Services compose the domain's store traits and the cache behind `Arc<dyn _>`
//! handles and expose the operations HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::LinkResolver`] - Alias creation and cache-aside resolution
//! - [`services::ClickRecorder`] - Geo enrichment and click persistence
//! - [`services::Aggregator`] - Windowed click analytics

pub mod services;
