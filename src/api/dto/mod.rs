//! Data Transfer Objects for API requests and responses.
//!
//! JSON bodies are camelCase. Request bodies are checked with validator before
//! they reach the services.

pub mod health;
pub mod links;
pub mod stats;
