//! HTTP middleware and extractors.
//!
//! - [`identity`] - `X-User-Id` caller identity
//! - [`rate_limit`] - per-IP token bucket
//! - [`tracing`] - request/response logging

pub mod identity;
pub mod rate_limit;
pub mod tracing;
