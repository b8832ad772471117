//! Order placement for the e-shop.
//!
//! An `Order` binds a `ShoppingCart` to a `ShippingService` and places it in
//! one linear pass:
//! 1. Validate the shipping type and due date
//! 2. Debit stock for every cart line
//! 3. Persist the shipment and publish its id
//! 4. Clear the cart
//!
//! Stock debits, the shipment write and the publish are not one transaction.
//! By default a failure after step 2 leaves the debits in place and needs
//! manual reconciliation; `Compensation::RestoreStock` puts them back instead.

pub mod error;
pub mod order;

pub use error::{CheckoutError, Result};
pub use order::{Compensation, DEFAULT_DUE_DATE_OFFSET_SECS, Order};
