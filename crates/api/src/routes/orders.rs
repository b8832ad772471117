//! Order placement endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use checkout::Order;
use chrono::{DateTime, Utc};
use domain::ShoppingCart;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    /// Caller-supplied order id; a UUID is generated when absent.
    pub order_id: Option<String>,
    pub shipping_type: String,
    /// RFC 3339 timestamp; the configured default applies when absent.
    pub due_date: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Deserialize)]
pub struct OrderLineRequest {
    pub product: String,
    pub amount: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderPlacedResponse {
    pub order_id: String,
    pub shipment_id: String,
    pub total_cents: i64,
}

// -- Handlers --

/// POST /orders: build a cart from catalog products and place it.
///
/// Lines naming the same product overwrite each other, last one wins.
#[tracing::instrument(skip(state, req), fields(shipping_type = %req.shipping_type, lines = req.items.len()))]
pub async fn place(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderPlacedResponse>), ApiError> {
    let due_date = req.due_date.as_deref().map(parse_due_date).transpose()?;

    let mut cart = ShoppingCart::new();
    for line in &req.items {
        let product = state
            .product(&line.product)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", line.product)))?;
        cart.add_product(&product, line.amount)?;
    }
    let total = cart.calculate_total()?;

    let shipping = Arc::clone(&state.shipping);
    let order = match req.order_id {
        Some(order_id) => Order::with_id(order_id, cart, shipping),
        None => Order::new(cart, shipping),
    };
    let mut order = order.with_compensation(state.compensation);

    let shipment_id = order.place_order(&req.shipping_type, due_date).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderPlacedResponse {
            order_id: order.order_id().to_string(),
            shipment_id: shipment_id.to_string(),
            total_cents: total.cents(),
        }),
    ))
}

fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| ApiError::BadRequest(format!("Invalid due_date {raw}: {e}")))
}
