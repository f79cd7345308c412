//! Process-wide metadata cache keyed by type identity. Entries are write-once.

use crate::error::ModelError;
use crate::model::{model_info, Model, ModelMetadata};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

struct Entry {
    name: &'static str,
    metadata: Arc<ModelMetadata>,
}

#[derive(Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static MetadataCache {
        static GLOBAL: OnceLock<MetadataCache> = OnceLock::new();
        GLOBAL.get_or_init(MetadataCache::new)
    }

    /// Cached metadata for `M`, resolving on first request. When two callers race, the first insert wins.
    pub fn resolve<M: Model>(&self) -> Arc<ModelMetadata> {
        let key = TypeId::of::<M>();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&key) {
                return entry.metadata.clone();
            }
        }
        let resolved = Arc::new(model_info::<M>());
        tracing::trace!(model = M::model_name(), table = %resolved.table_name, "metadata cache miss");
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key)
            .or_insert(Entry {
                name: M::model_name(),
                metadata: resolved,
            })
            .metadata
            .clone()
    }

    pub fn resolve_of<M: Model>(&self, _model: &M) -> Arc<ModelMetadata> {
        self.resolve::<M>()
    }

    /// Metadata of a previously resolved model, by its simple name.
    pub fn by_name(&self, name: &str) -> Result<Arc<ModelMetadata>, ModelError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .values()
            .find(|e| e.name == name)
            .map(|e| e.metadata.clone())
            .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`MetadataCache::resolve`] against the process-wide cache.
pub fn cached_model_info<M: Model>() -> Arc<ModelMetadata> {
    MetadataCache::global().resolve::<M>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::thread;

    #[derive(Serialize)]
    struct Invoice;

    impl Model for Invoice {}

    #[derive(Serialize)]
    struct Customer;

    impl Model for Customer {
        fn with_table_name() -> Option<String> {
            Some("clients".into())
        }
    }

    #[test]
    fn test_resolves_once_per_type() {
        let cache = MetadataCache::new();
        let first = cache.resolve::<Invoice>();
        let second = cache.resolve::<Invoice>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.table_name, "invoices");
    }

    #[test]
    fn test_by_name() {
        let cache = MetadataCache::new();
        assert_eq!(cache.by_name("Customer"), Err(ModelError::UnknownModel("Customer".into())));
        cache.resolve_of(&Customer);
        assert_eq!(cache.by_name("Customer").unwrap().table_name, "clients");
    }

    #[test]
    fn test_concurrent_resolution_shares_one_entry() {
        let cache = Arc::new(MetadataCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || cache.resolve::<Invoice>())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        let stored = cache.resolve::<Invoice>();
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &stored)));
    }

    #[test]
    fn test_global_cache() {
        let a = cached_model_info::<Customer>();
        let b = MetadataCache::global().resolve::<Customer>();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
