//! Order placement orchestration.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::{OrderId, ShipmentId};
use domain::{Product, ShoppingCart};
use shipping::{ShippingPublisher, ShippingRepository, ShippingService};

use crate::error::{CheckoutError, Result};

/// Due date used when the caller gives none: this many seconds from now.
pub const DEFAULT_DUE_DATE_OFFSET_SECS: i64 = 3;

/// What to do with stock already debited when placement fails halfway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compensation {
    /// Leave the debits in place. The failure is logged for reconciliation.
    #[default]
    None,
    /// Put every debited unit back with `Product::restock`.
    RestoreStock,
}

/// One checkout attempt: a cart bound to a shipping service.
pub struct Order<R, P>
where
    R: ShippingRepository,
    P: ShippingPublisher,
{
    order_id: OrderId,
    cart: ShoppingCart,
    shipping: Arc<ShippingService<R, P>>,
    compensation: Compensation,
}

impl<R, P> Order<R, P>
where
    R: ShippingRepository,
    P: ShippingPublisher,
{
    /// Creates an order with a generated id.
    pub fn new(cart: ShoppingCart, shipping: Arc<ShippingService<R, P>>) -> Self {
        Self::with_id(OrderId::new(), cart, shipping)
    }

    /// Creates an order with a caller-supplied id.
    pub fn with_id(
        order_id: impl Into<OrderId>,
        cart: ShoppingCart,
        shipping: Arc<ShippingService<R, P>>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            cart,
            shipping,
            compensation: Compensation::default(),
        }
    }

    /// Sets the compensation applied when placement fails after debiting.
    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn cart(&self) -> &ShoppingCart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut ShoppingCart {
        &mut self.cart
    }

    pub fn into_cart(self) -> ShoppingCart {
        self.cart
    }

    /// Places the order and returns the id of the created shipment.
    ///
    /// `due_date` defaults to [`DEFAULT_DUE_DATE_OFFSET_SECS`] from now. An
    /// unknown shipping type or a past due date fails before anything is
    /// touched. The cart is cleared only once the shipment has been
    /// persisted and published; on any later failure it is left as it was.
    ///
    /// Placing an empty cart is allowed and creates a shipment with no
    /// products.
    #[tracing::instrument(skip(self), fields(order_id = %self.order_id, lines = self.cart.len()))]
    pub async fn place_order(
        &mut self,
        shipping_type: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<ShipmentId> {
        let started = std::time::Instant::now();

        let result = self.try_place_order(shipping_type, due_date).await;

        match &result {
            Ok(shipment_id) => {
                let duration = started.elapsed().as_secs_f64();
                metrics::counter!("orders_placed_total").increment(1);
                metrics::histogram!("order_placement_duration_seconds").record(duration);
                tracing::info!(%shipment_id, duration, "order placed");
            }
            Err(e) => {
                metrics::counter!("order_placement_failures_total", "kind" => e.kind())
                    .increment(1);
                tracing::warn!(error = %e, "order placement failed");
            }
        }

        result
    }

    async fn try_place_order(
        &mut self,
        shipping_type: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<ShipmentId> {
        // 1. Validate
        let now = Utc::now();
        let due_date =
            due_date.unwrap_or_else(|| now + Duration::seconds(DEFAULT_DUE_DATE_OFFSET_SECS));

        if !self.shipping.config().contains(shipping_type) {
            return Err(CheckoutError::InvalidShippingType(
                shipping_type.to_string(),
            ));
        }
        if due_date < now {
            return Err(CheckoutError::DueDateInPast { due_date });
        }

        // 2. Debit stock
        let debited = self.debit_stock()?;

        // 3. Persist + publish
        let product_names = self.cart.product_names();
        let shipment_id = match self
            .shipping
            .create_shipping(shipping_type, product_names, &self.order_id, due_date)
            .await
        {
            Ok(shipment_id) => shipment_id,
            Err(e) => {
                self.compensate(&debited);
                return Err(e.into());
            }
        };

        // 4. Clear the cart
        self.cart.clear();

        Ok(shipment_id)
    }

    /// Buys every cart line in iteration order. Returns what was debited.
    fn debit_stock(&self) -> Result<Vec<(Arc<Product>, u32)>> {
        let mut debited = Vec::with_capacity(self.cart.len());

        for line in self.cart.lines() {
            if let Err(e) = line.product().buy(line.amount()) {
                self.compensate(&debited);
                return Err(e.into());
            }
            debited.push((Arc::clone(line.product()), line.amount()));
        }

        Ok(debited)
    }

    fn compensate(&self, debited: &[(Arc<Product>, u32)]) {
        if debited.is_empty() {
            return;
        }

        match self.compensation {
            Compensation::None => {
                tracing::warn!(
                    order_id = %self.order_id,
                    lines = debited.len(),
                    "stock debited for an order that was not placed; needs reconciliation"
                );
            }
            Compensation::RestoreStock => {
                for (product, amount) in debited.iter().rev() {
                    product.restock(*amount);
                }
                tracing::info!(
                    order_id = %self.order_id,
                    lines = debited.len(),
                    "debited stock restored"
                );
            }
        }
    }
}
