//! Core domain entities.
//!
//! Entities are plain data structures. Each has a separate input struct used
//! for creation, with store-assigned fields (timestamps, ids) filled in on write:
//!
//! - [`Alias`] / [`NewAlias`] - short code to destination mapping
//! - [`ClickEvent`] / [`NewClickEvent`] - one resolved redirect
//! - [`GeoLocation`] - coarse location attached to a click

pub mod alias;
pub mod click;

pub use alias::{Alias, NewAlias};
pub use click::{ClickEvent, GeoLocation, NewClickEvent};
