//! Catalog Core - Product types and listing logic.
//!
//! This crate provides the pieces of the catalog storefront that do no I/O:
//! - [`types`] - Newtype wrappers for product IDs and prices, plus the
//!   `Product` record as served by the upstream API
//! - [`listing`] - Category set, selection state and the derived list
//!   pipeline (filter, search, sort, paginate)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no caches, no templates. The storefront crate fetches products and runs
//! the [`listing`] functions over them per request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod types;

pub use types::*;
