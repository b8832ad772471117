//! Shipment queue publisher trait and in-memory implementation.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ShipmentId;

use crate::error::{Result, ShippingError};

/// Queue that announces new shipments to downstream processing.
///
/// Delivery is at-least-once: a consumer may see the same id twice and must
/// handle it idempotently.
#[async_trait]
pub trait ShippingPublisher: Send + Sync {
    /// Enqueues the id of a newly created shipment.
    async fn send_new_shipping(&self, shipment_id: &ShipmentId) -> Result<()>;

    /// Takes up to `batch_size` ids off the queue, oldest first.
    async fn poll_shipping(&self, batch_size: usize) -> Result<Vec<ShipmentId>>;
}

#[async_trait]
impl<T: ShippingPublisher + ?Sized> ShippingPublisher for Arc<T> {
    async fn send_new_shipping(&self, shipment_id: &ShipmentId) -> Result<()> {
        (**self).send_new_shipping(shipment_id).await
    }

    async fn poll_shipping(&self, batch_size: usize) -> Result<Vec<ShipmentId>> {
        (**self).poll_shipping(batch_size).await
    }
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    queue: VecDeque<ShipmentId>,
    sent: Vec<ShipmentId>,
    fail_on_send: bool,
}

/// In-memory FIFO queue for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingPublisher {
    state: Arc<RwLock<InMemoryPublisherState>>,
}

impl InMemoryShippingPublisher {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to fail on send calls.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns every id ever sent, in send order.
    pub fn sent(&self) -> Vec<ShipmentId> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns the number of ids waiting in the queue.
    pub fn pending_count(&self) -> usize {
        self.state.read().unwrap().queue.len()
    }
}

#[async_trait]
impl ShippingPublisher for InMemoryShippingPublisher {
    async fn send_new_shipping(&self, shipment_id: &ShipmentId) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(ShippingError::Publisher("Queue unavailable".to_string()));
        }

        state.queue.push_back(shipment_id.clone());
        state.sent.push(shipment_id.clone());
        Ok(())
    }

    async fn poll_shipping(&self, batch_size: usize) -> Result<Vec<ShipmentId>> {
        let mut state = self.state.write().unwrap();
        let take = batch_size.min(state.queue.len());
        Ok(state.queue.drain(..take).collect())
    }
}
