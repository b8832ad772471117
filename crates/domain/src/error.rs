//! Domain error types.

use thiserror::Error;

use crate::Money;

/// Errors raised by products and carts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Requested amount exceeds the product's current stock.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },

    /// Cart quantities must be positive.
    #[error("Invalid quantity for {product}: {quantity} (must be greater than 0)")]
    InvalidQuantity { product: String, quantity: u32 },

    /// A line or cart total does not fit in `Money`.
    #[error("Amount overflow while pricing {product}")]
    AmountOverflow { product: String },

    /// Product prices must not be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },
}
