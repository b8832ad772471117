//! Shared types for the e-shop workspace.

mod types;

pub use types::{OrderId, ShipmentId};
