//! Checkout error types.

use chrono::{DateTime, Utc};
use domain::DomainError;
use shipping::ShippingError;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The shipping type is not in the service's catalog.
    #[error("Shipping type is not available: {0}")]
    InvalidShippingType(String),

    /// The requested due date has already passed.
    #[error("Shipment date cannot be in the past: {due_date}")]
    DueDateInPast { due_date: DateTime<Utc> },

    /// A product or cart rule was violated (e.g. insufficient stock).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The shipment could not be persisted or published.
    #[error("Shipping error: {0}")]
    Shipping(#[from] ShippingError),
}

impl CheckoutError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::InvalidShippingType(_) => "invalid_shipping_type",
            CheckoutError::DueDateInPast { .. } => "due_date_in_past",
            CheckoutError::Domain(DomainError::InsufficientStock { .. }) => "insufficient_stock",
            CheckoutError::Domain(_) => "domain",
            CheckoutError::Shipping(_) => "shipping",
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
