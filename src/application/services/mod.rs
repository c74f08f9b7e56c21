//! Business logic services for the application layer.

pub mod aggregator;
pub mod click_recorder;
pub mod link_resolver;

pub use aggregator::Aggregator;
pub use click_recorder::ClickRecorder;
pub use link_resolver::{AliasCreation, CreateAlias, LinkResolver};
