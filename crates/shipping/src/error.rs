//! Shipping error types.

use common::ShipmentId;
use thiserror::Error;

/// Errors that can occur while creating or processing shipments.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// The shipment repository rejected or failed an operation.
    #[error("Shipping repository error: {0}")]
    Repository(String),

    /// The queue publisher failed.
    #[error("Shipping publisher error: {0}")]
    Publisher(String),

    /// No shipment record with this id.
    #[error("Shipment not found: {0}")]
    NotFound(ShipmentId),

    /// A stored record could not be decoded.
    #[error("Invalid shipment record: {0}")]
    InvalidRecord(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for shipping operations.
pub type Result<T> = std::result::Result<T, ShippingError>;
