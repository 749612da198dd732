//! Plugin-based store registry
//!
//! The registry allows zone record stores to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains in the harness.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonesync_core::{ProviderConfig, StoreRegistry};
//!
//! let registry = StoreRegistry::new();
//! zonesync_provider_regery::register(&registry);
//!
//! let store = registry.create_store(&ProviderConfig::regery("token", "secret"))?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{StoreFactory, ZoneRecordStore};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry for plugin-based store creation
///
/// Maps provider type names to factory objects. Interior mutability with
/// `RwLock` allows concurrent reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Box<dyn StoreFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store factory under `name` (e.g., "regery")
    ///
    /// Registering the same name again replaces the earlier factory.
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn StoreFactory>) {
        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        stores.insert(name.into(), factory);
    }

    /// Create a store from configuration
    ///
    /// The configuration is validated before the factory sees it.
    pub fn create_store(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneRecordStore>> {
        config.validate()?;

        let store_type = config.type_name();
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);

        let factory = stores
            .get(store_type)
            .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?;

        factory.create(config)
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        stores.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use async_trait::async_trait;

    struct EmptyStore;

    #[async_trait]
    impl ZoneRecordStore for EmptyStore {
        async fn list(&self, _zone: &str) -> Result<Vec<Record>> {
            Ok(Vec::new())
        }

        fn store_name(&self) -> &'static str {
            "empty"
        }
    }

    struct EmptyStoreFactory;

    impl StoreFactory for EmptyStoreFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn ZoneRecordStore>> {
            Ok(Box::new(EmptyStore))
        }
    }

    fn custom(factory: &str) -> ProviderConfig {
        ProviderConfig::Custom {
            factory: factory.to_string(),
            config: serde_json::json!({}),
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = StoreRegistry::new();
        assert!(!registry.has_store("empty"));

        registry.register_store("empty", Box::new(EmptyStoreFactory));

        assert!(registry.has_store("empty"));
        assert_eq!(registry.list_stores(), vec!["empty".to_string()]);
    }

    #[test]
    fn test_create_registered_store() {
        let registry = StoreRegistry::new();
        registry.register_store("empty", Box::new(EmptyStoreFactory));

        let store = registry.create_store(&custom("empty")).unwrap();
        assert_eq!(store.store_name(), "empty");
    }

    #[test]
    fn test_create_unknown_store_fails() {
        let registry = StoreRegistry::new();
        let err = registry.create_store(&custom("missing")).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_create_store_validates_config_first() {
        let registry = StoreRegistry::new();
        registry.register_store("regery", Box::new(EmptyStoreFactory));

        let result = registry.create_store(&ProviderConfig::regery("", "secret"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
