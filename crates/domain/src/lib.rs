//! Domain layer for the e-shop.
//!
//! This crate provides the in-memory side of order placement:
//! - `Product`, a priced catalog entry with an atomically guarded stock counter
//! - `ShoppingCart`, a single-owner selection of products keyed by name
//! - `Money`, an integer amount in cents

pub mod cart;
pub mod error;
pub mod money;
pub mod product;

pub use cart::{CartLine, ShoppingCart};
pub use error::DomainError;
pub use money::Money;
pub use product::{Product, ProductKey};
