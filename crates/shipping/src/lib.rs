//! Shipping service for the e-shop.
//!
//! The service owns the shipping-type catalog and the shipment lifecycle
//! (`created` → `in progress` → `completed` | `failed`). Storage and queueing
//! are delegated to two collaborators:
//! - `ShippingRepository`: durable shipment records (in-memory or PostgreSQL)
//! - `ShippingPublisher`: at-least-once queue of new shipment ids

pub mod config;
pub mod error;
pub mod postgres;
pub mod publisher;
pub mod record;
pub mod repository;
pub mod service;
pub mod status;

pub use common::{OrderId, ShipmentId};
pub use config::{DEFAULT_SHIPPING_TYPES, ShippingConfig};
pub use error::{Result, ShippingError};
pub use postgres::PostgresShippingRepository;
pub use publisher::{InMemoryShippingPublisher, ShippingPublisher};
pub use record::{NewShipment, ProcessedShipment, ProcessingOutcome, ShipmentRecord};
pub use repository::{InMemoryShippingRepository, ShippingRepository};
pub use service::ShippingService;
pub use status::ShippingStatus;
