//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use checkout::Compensation;
use domain::Product;
use shipping::{ShippingPublisher, ShippingRepository, ShippingService};
use tokio::sync::RwLock;

/// Shipping service over type-erased collaborators, so the same router
/// serves both the in-memory and the PostgreSQL repository.
pub type DynShippingService =
    ShippingService<Arc<dyn ShippingRepository>, Arc<dyn ShippingPublisher>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    /// Products on sale, keyed by name.
    pub catalog: RwLock<HashMap<String, Arc<Product>>>,
    pub shipping: Arc<DynShippingService>,
    pub compensation: Compensation,
}

impl AppState {
    pub fn new(shipping: Arc<DynShippingService>) -> Self {
        Self {
            catalog: RwLock::new(HashMap::new()),
            shipping,
            compensation: Compensation::default(),
        }
    }

    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    /// Adds a product to the catalog. Returns false if the name is taken.
    pub async fn add_product(&self, product: Product) -> bool {
        let mut catalog = self.catalog.write().await;
        if catalog.contains_key(product.name()) {
            return false;
        }
        catalog.insert(product.name().to_string(), Arc::new(product));
        true
    }

    pub async fn product(&self, name: &str) -> Option<Arc<Product>> {
        self.catalog.read().await.get(name).cloned()
    }
}
