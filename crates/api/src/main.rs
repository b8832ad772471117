//! API server entry point.

use std::sync::Arc;

use api::AppState;
use api::config::Config;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Shipping service: PostgreSQL when configured, in memory otherwise
    let shipping = match &config.database_url {
        Some(url) => {
            tracing::info!("storing shipments in PostgreSQL");
            api::create_postgres_shipping(config.shipping.clone(), url)
                .await
                .expect("failed to connect to PostgreSQL")
        }
        None => {
            tracing::info!("storing shipments in memory");
            api::create_in_memory_shipping(config.shipping.clone())
        }
    };
    let state = Arc::new(AppState::new(shipping.clone()).with_compensation(config.compensation()));

    // 4. Start the shipping worker
    let worker = api::worker::spawn_shipping_worker(
        shipping,
        config.shipping_batch_size,
        config.shipping_poll_interval,
    );

    // 5. Build the application
    let app = api::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    worker.abort();
    tracing::info!("server shut down gracefully");
}
