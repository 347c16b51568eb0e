//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::{ProductId, ProductIdError};
pub use price::Price;
pub use product::{Product, Rating};
