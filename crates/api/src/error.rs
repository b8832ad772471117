//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::DomainError;
use shipping::ShippingError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),
    /// The resource already exists.
    #[error("{0}")]
    Conflict(String),
    /// Product or cart rule violated.
    #[error(transparent)]
    Domain(DomainError),
    /// Order placement failed.
    #[error(transparent)]
    Checkout(CheckoutError),
    /// Shipment lookup or storage failed.
    #[error(transparent)]
    Shipping(ShippingError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Domain(err) => domain_status(err),
            ApiError::Checkout(err) => checkout_status(err),
            ApiError::Shipping(err) => shipping_status(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::InsufficientStock { .. } => StatusCode::CONFLICT,
        DomainError::InvalidQuantity { .. }
        | DomainError::InvalidPrice { .. }
        | DomainError::AmountOverflow { .. } => StatusCode::BAD_REQUEST,
    }
}

fn checkout_status(err: &CheckoutError) -> StatusCode {
    match err {
        CheckoutError::InvalidShippingType(_) | CheckoutError::DueDateInPast { .. } => {
            StatusCode::BAD_REQUEST
        }
        CheckoutError::Domain(err) => domain_status(err),
        CheckoutError::Shipping(err) => shipping_status(err),
    }
}

fn shipping_status(err: &ShippingError) -> StatusCode {
    match err {
        ShippingError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<ShippingError> for ApiError {
    fn from(err: ShippingError) -> Self {
        ApiError::Shipping(err)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::ShipmentId;

    use super::*;

    #[test]
    fn test_checkout_errors_map_to_client_errors() {
        let invalid = ApiError::from(CheckoutError::InvalidShippingType("Teleport".into()));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let past = ApiError::from(CheckoutError::DueDateInPast {
            due_date: Utc::now(),
        });
        assert_eq!(past.status_code(), StatusCode::BAD_REQUEST);

        let stock = ApiError::from(CheckoutError::Domain(DomainError::InsufficientStock {
            product: "A".into(),
            requested: 2,
            available: 1,
        }));
        assert_eq!(stock.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_shipping_errors() {
        let missing = ApiError::from(ShippingError::NotFound(ShipmentId::from("x")));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let broken = ApiError::from(CheckoutError::Shipping(ShippingError::Publisher(
            "queue down".into(),
        )));
        assert_eq!(broken.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_passes_through() {
        let err = ApiError::from(CheckoutError::InvalidShippingType("Teleport".into()));
        assert_eq!(err.to_string(), "Shipping type is not available: Teleport");
    }
}
