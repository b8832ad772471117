//! Shipping-type catalog and shipment lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shipping::{ShipmentId, ShipmentRecord, ShippingStatus};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ShippingTypesResponse {
    pub shipping_types: Vec<String>,
}

#[derive(Serialize)]
pub struct ShipmentResponse {
    pub shipment_id: String,
    pub order_id: String,
    pub shipping_type: String,
    /// Product names joined with commas.
    pub product_ids: String,
    pub status: ShippingStatus,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<ShipmentRecord> for ShipmentResponse {
    fn from(record: ShipmentRecord) -> Self {
        Self {
            product_ids: record.product_ids(),
            shipment_id: record.shipment_id.to_string(),
            order_id: record.order_id.to_string(),
            shipping_type: record.shipping_type,
            status: record.status,
            due_date: record.due_date,
            created_at: record.created_at,
        }
    }
}

/// GET /shipping-types: the supported shipping types, in catalog order.
pub async fn shipping_types(State(state): State<Arc<AppState>>) -> Json<ShippingTypesResponse> {
    Json(ShippingTypesResponse {
        shipping_types: state.shipping.list_available_shipping_type().to_vec(),
    })
}

/// GET /shipments/:id: load a shipment record.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ShipmentResponse>, ApiError> {
    let record = state.shipping.get_shipping(&ShipmentId::from(id)).await?;
    Ok(Json(record.into()))
}
