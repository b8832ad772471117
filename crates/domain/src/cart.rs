//! Shopping cart.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{DomainError, Money, Product, ProductKey};

/// One entry of a cart: a product and the quantity requested.
#[derive(Debug, Clone)]
pub struct CartLine {
    product: Arc<Product>,
    amount: u32,
}

impl CartLine {
    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Returns `price * amount` for this line.
    pub fn total_price(&self) -> Result<Money, DomainError> {
        self.product
            .price()
            .checked_multiply(self.amount)
            .ok_or_else(|| DomainError::AmountOverflow {
                product: self.product.name().to_string(),
            })
    }
}

/// A selection of products with quantities, keyed by product name.
///
/// Adding a product whose name is already present replaces its quantity.
/// Availability is checked when a product is added but nothing is reserved:
/// stock is only taken when the order is placed.
#[derive(Debug, Clone, Default)]
pub struct ShoppingCart {
    lines: HashMap<ProductKey, CartLine>,
}

impl ShoppingCart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested quantity of `product` to `amount`.
    ///
    /// Fails, leaving the cart unchanged, if the product does not currently
    /// have `amount` units in stock.
    pub fn add_product(&mut self, product: &Arc<Product>, amount: u32) -> Result<(), DomainError> {
        if amount == 0 {
            return Err(DomainError::InvalidQuantity {
                product: product.name().to_string(),
                quantity: amount,
            });
        }

        if !product.is_available(amount) {
            return Err(DomainError::InsufficientStock {
                product: product.name().to_string(),
                requested: amount,
                available: product.available_amount(),
            });
        }

        tracing::debug!(product = %product, amount, "cart line set");
        self.lines.insert(
            product.key(),
            CartLine {
                product: Arc::clone(product),
                amount,
            },
        );
        Ok(())
    }

    /// Removes `product` from the cart. Removing an absent product does nothing.
    pub fn remove_product(&mut self, product: &Product) {
        self.lines.remove(&product.key());
    }

    pub fn contains_product(&self, product: &Product) -> bool {
        self.lines.contains_key(&product.key())
    }

    /// Returns the requested quantity of `product`, if present.
    pub fn quantity_of(&self, product: &Product) -> Option<u32> {
        self.lines.get(&product.key()).map(|line| line.amount)
    }

    /// Returns the sum of `price * amount` over all lines.
    ///
    /// Fails with `AmountOverflow` if a line or the sum does not fit in
    /// `Money`.
    pub fn calculate_total(&self) -> Result<Money, DomainError> {
        self.lines.values().try_fold(Money::zero(), |total, line| {
            total
                .checked_add(line.total_price()?)
                .ok_or_else(|| DomainError::AmountOverflow {
                    product: line.product.name().to_string(),
                })
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Returns one name per distinct product, in iteration order.
    pub fn product_names(&self) -> Vec<String> {
        self.lines
            .values()
            .map(|line| line.product.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
