//! Catalog product with a stock counter.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::{DomainError, Money};

/// Identity of a product inside a cart: its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Product> for ProductKey {
    fn from(product: &Product) -> Self {
        product.key()
    }
}

/// A priced catalog entry with a limited stock.
///
/// Products are shared between the catalog, carts and orders (usually as
/// `Arc<Product>`), so the stock lives in an atomic counter. `buy` is the only
/// operation that takes stock away and it never lets the counter go below zero.
///
/// Two products are equal when their names are equal; price and stock are
/// ignored.
#[derive(Debug)]
pub struct Product {
    name: String,
    price: Money,
    available_amount: AtomicU32,
}

impl Product {
    /// Creates a product with its initial stock.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        available_amount: u32,
    ) -> Result<Self, DomainError> {
        if price.is_negative() {
            return Err(DomainError::InvalidPrice { price });
        }

        Ok(Self {
            name: name.into(),
            price,
            available_amount: AtomicU32::new(available_amount),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the current stock.
    pub fn available_amount(&self) -> u32 {
        self.available_amount.load(Ordering::Acquire)
    }

    /// Returns the key used to identify this product in a cart.
    pub fn key(&self) -> ProductKey {
        ProductKey(self.name.clone())
    }

    /// Returns true if `amount` units could be bought right now.
    pub fn is_available(&self, amount: u32) -> bool {
        amount <= self.available_amount()
    }

    /// Takes `amount` units out of stock.
    ///
    /// The check and the decrement happen in one compare-and-swap loop, so
    /// concurrent buyers of the same product can never oversell it. On failure
    /// the stock is left untouched.
    pub fn buy(&self, amount: u32) -> Result<(), DomainError> {
        self.available_amount
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(amount)
            })
            .map(|_| ())
            .map_err(|available| DomainError::InsufficientStock {
                product: self.name.clone(),
                requested: amount,
                available,
            })
    }

    /// Puts `amount` units back into stock.
    ///
    /// Only used to compensate a `buy` whose order could not be placed.
    ///
    /// Stock saturates at `u32::MAX`.
    pub fn restock(&self, amount: u32) {
        let mut current = self.available_amount.load(Ordering::Acquire);
        loop {
            let next = current.saturating_add(amount);
            match self.available_amount.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
