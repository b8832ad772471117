//! HTTP API server for the e-shop checkout.
//!
//! Serves the product catalog, order placement and shipment lookup, with
//! structured logging (tracing) and Prometheus metrics. A background worker
//! settles queued shipments.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod worker;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use shipping::{
    InMemoryShippingPublisher, InMemoryShippingRepository, PostgresShippingRepository,
    ShippingConfig, ShippingPublisher, ShippingRepository, ShippingService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, DynShippingService};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/shipping-types", get(routes::shipments::shipping_types))
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route("/orders", post(routes::orders::place))
        .route("/shipments/{id}", get(routes::shipments::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates a shipping service backed by the in-memory repository and queue.
pub fn create_in_memory_shipping(config: ShippingConfig) -> Arc<DynShippingService> {
    let repository: Arc<dyn ShippingRepository> = Arc::new(InMemoryShippingRepository::new());
    let publisher: Arc<dyn ShippingPublisher> = Arc::new(InMemoryShippingPublisher::new());
    Arc::new(ShippingService::new(config, repository, publisher))
}

/// Creates a shipping service that stores shipments in PostgreSQL.
///
/// The `shipments` table is created if missing. The queue stays in memory.
pub async fn create_postgres_shipping(
    config: ShippingConfig,
    database_url: &str,
) -> shipping::Result<Arc<DynShippingService>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    let repository = PostgresShippingRepository::new(pool);
    repository.create_table_if_missing().await?;

    let repository: Arc<dyn ShippingRepository> = Arc::new(repository);
    let publisher: Arc<dyn ShippingPublisher> = Arc::new(InMemoryShippingPublisher::new());
    Ok(Arc::new(ShippingService::new(config, repository, publisher)))
}

/// Creates the default application state: empty catalog, in-memory shipping.
pub fn create_default_state(config: ShippingConfig) -> Arc<AppState> {
    Arc::new(AppState::new(create_in_memory_shipping(config)))
}
