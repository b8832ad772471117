//! Application configuration loaded from environment variables.

use std::time::Duration;

use checkout::Compensation;
use shipping::ShippingConfig;

const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `SHIPPING_TYPES`: comma-separated shipping-type catalog (default: the
///   four built-in carriers)
/// - `DATABASE_URL`: PostgreSQL connection string; shipments are kept in
///   memory when unset
/// - `SHIPPING_BATCH_SIZE`: ids drained from the queue per tick (default: `10`)
/// - `SHIPPING_POLL_INTERVAL_MS`: queue poll period (default: `1000`)
/// - `RESTORE_STOCK_ON_FAILURE`: put debited stock back when a placement
///   fails halfway (default: `false`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub shipping: ShippingConfig,
    pub database_url: Option<String>,
    pub shipping_batch_size: usize,
    pub shipping_poll_interval: Duration,
    pub restore_stock_on_failure: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            shipping: lookup("SHIPPING_TYPES")
                .map(|list| ShippingConfig::from_list(&list))
                .filter(|config| !config.shipping_types().is_empty())
                .unwrap_or(defaults.shipping),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            shipping_batch_size: lookup("SHIPPING_BATCH_SIZE")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.shipping_batch_size),
            shipping_poll_interval: lookup("SHIPPING_POLL_INTERVAL_MS")
                .and_then(|ms| ms.parse().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.shipping_poll_interval),
            restore_stock_on_failure: lookup("RESTORE_STOCK_ON_FAILURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.restore_stock_on_failure),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn compensation(&self) -> Compensation {
        if self.restore_stock_on_failure {
            Compensation::RestoreStock
        } else {
            Compensation::None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            shipping: ShippingConfig::default(),
            database_url: None,
            shipping_batch_size: DEFAULT_BATCH_SIZE,
            shipping_poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            restore_stock_on_failure: false,
        }
    }
}
