//! Domain layer containing business entities and contracts.
//!
//! Independent of infrastructure and presentation. Defines the data model and
//! the traits that storage and enrichment backends implement.
//!
//! # Architecture
//!
//! - [`entities`] - Alias and click event data structures
//! - [`repositories`] - Durable store traits ([`repositories::DestinationStore`], [`repositories::EventStore`])
//! - [`geo`] - Best-effort geolocation contract
//! - [`window`] - Trailing time windows for analytics
//! - [`aggregate`] - Pure click aggregation
//! - [`click_context`] - Request metadata captured per click
//!
//! # Redirect Flow
//!
//! 1. HTTP handler builds a [`click_context::ClickContext`]
//! 2. [`crate::application::services::LinkResolver`] resolves the alias cache-aside
//! 3. [`crate::application::services::ClickRecorder`] enriches and appends the event
//! 4. Handler returns `302 Found`

pub mod aggregate;
pub mod click_context;
pub mod entities;
pub mod geo;
pub mod repositories;
pub mod window;
