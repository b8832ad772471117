//! Shipment repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::ShipmentId;

use crate::error::{Result, ShippingError};
use crate::record::{NewShipment, ShipmentRecord};
use crate::status::ShippingStatus;

/// Durable storage for shipment records.
#[async_trait]
pub trait ShippingRepository: Send + Sync {
    /// Writes a new record and returns the id it can be read back with.
    async fn create_shipping(&self, shipment: NewShipment) -> Result<ShipmentId>;

    /// Reads a record. Returns None if the id is unknown.
    async fn get_shipping(&self, shipment_id: &ShipmentId) -> Result<Option<ShipmentRecord>>;

    /// Overwrites the status of an existing record.
    ///
    /// Fails with `NotFound` if the id is unknown.
    async fn update_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        status: ShippingStatus,
    ) -> Result<()>;

    /// Moves a record from `from` to `to`, only if it is still in `from`.
    ///
    /// Returns false, leaving the record untouched, if its status is
    /// something else. Fails with `NotFound` if the id is unknown.
    async fn advance_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        from: ShippingStatus,
        to: ShippingStatus,
    ) -> Result<bool>;
}

#[async_trait]
impl<T: ShippingRepository + ?Sized> ShippingRepository for Arc<T> {
    async fn create_shipping(&self, shipment: NewShipment) -> Result<ShipmentId> {
        (**self).create_shipping(shipment).await
    }

    async fn get_shipping(&self, shipment_id: &ShipmentId) -> Result<Option<ShipmentRecord>> {
        (**self).get_shipping(shipment_id).await
    }

    async fn update_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        status: ShippingStatus,
    ) -> Result<()> {
        (**self).update_shipping_status(shipment_id, status).await
    }

    async fn advance_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        from: ShippingStatus,
        to: ShippingStatus,
    ) -> Result<bool> {
        (**self).advance_shipping_status(shipment_id, from, to).await
    }
}

#[derive(Debug, Default)]
struct InMemoryRepositoryState {
    records: HashMap<ShipmentId, ShipmentRecord>,
    next_id: Option<ShipmentId>,
    fail_on_create: bool,
    fail_on_update: bool,
}

/// In-memory shipment repository for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingRepository {
    state: Arc<RwLock<InMemoryRepositoryState>>,
}

impl InMemoryShippingRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the repository to fail on create calls.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Configures the repository to fail on status updates.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Makes the next create call use `id` instead of a random one.
    pub fn set_next_id(&self, id: impl Into<ShipmentId>) {
        self.state.write().unwrap().next_id = Some(id.into());
    }

    /// Returns the number of stored records.
    pub fn shipment_count(&self) -> usize {
        self.state.read().unwrap().records.len()
    }

    /// Returns a copy of the record with the given id.
    pub fn record(&self, shipment_id: &ShipmentId) -> Option<ShipmentRecord> {
        self.state.read().unwrap().records.get(shipment_id).cloned()
    }
}

#[async_trait]
impl ShippingRepository for InMemoryShippingRepository {
    async fn create_shipping(&self, shipment: NewShipment) -> Result<ShipmentId> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(ShippingError::Repository(
                "Shipment store unavailable".to_string(),
            ));
        }

        let shipment_id = state.next_id.take().unwrap_or_default();
        let record = ShipmentRecord::from_new(shipment_id.clone(), shipment, Utc::now());
        state.records.insert(shipment_id.clone(), record);

        Ok(shipment_id)
    }

    async fn get_shipping(&self, shipment_id: &ShipmentId) -> Result<Option<ShipmentRecord>> {
        Ok(self.record(shipment_id))
    }

    async fn update_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        status: ShippingStatus,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_update {
            return Err(ShippingError::Repository(
                "Shipment store unavailable".to_string(),
            ));
        }

        let record = state
            .records
            .get_mut(shipment_id)
            .ok_or_else(|| ShippingError::NotFound(shipment_id.clone()))?;
        record.status = status;
        Ok(())
    }

    async fn advance_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        from: ShippingStatus,
        to: ShippingStatus,
    ) -> Result<bool> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_update {
            return Err(ShippingError::Repository(
                "Shipment store unavailable".to_string(),
            ));
        }

        let record = state
            .records
            .get_mut(shipment_id)
            .ok_or_else(|| ShippingError::NotFound(shipment_id.clone()))?;
        if record.status != from {
            return Ok(false);
        }
        record.status = to;
        Ok(true)
    }
}
