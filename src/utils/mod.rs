//! Helpers shared by the service and HTTP layers.
//!
//! - [`code_generator`] - alias code generation and validation
//! - [`url_normalizer`] - destination URL canonicalization
//! - [`client_ip`] - client address resolution (peer or proxy headers)
//! - [`user_agent`] - OS and device classification

pub mod client_ip;
pub mod code_generator;
pub mod url_normalizer;
pub mod user_agent;
