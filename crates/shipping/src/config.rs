//! Shipping-type catalog.

/// Shipping types offered when nothing else is configured.
pub const DEFAULT_SHIPPING_TYPES: [&str; 4] =
    ["Нова Пошта", "Укр Пошта", "Meest Express", "Самовивіз"];

/// The ordered set of shipping types a `ShippingService` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingConfig {
    shipping_types: Vec<String>,
}

impl ShippingConfig {
    /// Creates a catalog from the given labels. Duplicates keep their first
    /// position; blank labels are dropped.
    pub fn new<I, T>(shipping_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut types: Vec<String> = Vec::new();
        for shipping_type in shipping_types {
            let shipping_type = shipping_type.into().trim().to_string();
            if !shipping_type.is_empty() && !types.contains(&shipping_type) {
                types.push(shipping_type);
            }
        }
        Self {
            shipping_types: types,
        }
    }

    /// Parses a comma-separated list, e.g. `"Нова Пошта, Самовивіз"`.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn shipping_types(&self) -> &[String] {
        &self.shipping_types
    }

    /// Returns true if `shipping_type` is in the catalog (exact match).
    pub fn contains(&self, shipping_type: &str) -> bool {
        self.shipping_types.iter().any(|t| t == shipping_type)
    }
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SHIPPING_TYPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let config = ShippingConfig::default();
        assert_eq!(
            config.shipping_types(),
            &["Нова Пошта", "Укр Пошта", "Meest Express", "Самовивіз"]
        );
    }

    #[test]
    fn test_from_list_trims_and_dedupes() {
        let config = ShippingConfig::from_list(" Courier ,Pickup,, Courier");
        assert_eq!(config.shipping_types(), &["Courier", "Pickup"]);
    }

    #[test]
    fn test_contains_is_exact() {
        let config = ShippingConfig::default();
        assert!(config.contains("Самовивіз"));
        assert!(!config.contains("Новий тип доставки"));
        assert!(!config.contains("нова пошта"));
    }
}
