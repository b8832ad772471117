//! Shipment records as written to and read from a repository.

use chrono::{DateTime, Utc};
use common::{OrderId, ShipmentId};
use serde::{Deserialize, Serialize};

use crate::status::ShippingStatus;

/// A shipment about to be written. The repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub shipping_type: String,
    /// One name per distinct product of the cart.
    pub product_names: Vec<String>,
    pub order_id: OrderId,
    pub status: ShippingStatus,
    pub due_date: DateTime<Utc>,
}

/// A stored shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub shipment_id: ShipmentId,
    pub shipping_type: String,
    pub product_names: Vec<String>,
    pub order_id: OrderId,
    pub status: ShippingStatus,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShipmentRecord {
    /// Builds the stored form of `shipment` under `shipment_id`.
    pub fn from_new(
        shipment_id: ShipmentId,
        shipment: NewShipment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            shipment_id,
            shipping_type: shipment.shipping_type,
            product_names: shipment.product_names,
            order_id: shipment.order_id,
            status: shipment.status,
            due_date: shipment.due_date,
            created_at,
        }
    }

    /// Returns the product names joined with commas (empty for an empty cart).
    pub fn product_ids(&self) -> String {
        self.product_names.join(",")
    }
}

/// What happened to one shipment during batch processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The shipment reached (or already had) this status.
    Processed(ShippingStatus),
    /// The shipment could not be processed; the batch carried on.
    Error(String),
}

/// Result entry of `ShippingService::process_shipping_batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedShipment {
    pub shipment_id: ShipmentId,
    pub outcome: ProcessingOutcome,
}
