use std::collections::HashMap;
use std::sync::RwLock;

use super::{CacheBackend, CacheEntry};
use crate::errors::{ProviderError, ProviderResult};

/// In-process backend. Readers share the lock; writers replace whole entries.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(operation: &str) -> ProviderError {
    ProviderError::cache(operation, "memory cache lock poisoned")
}

impl CacheBackend for MemoryCacheBackend {
    fn load(&self, fingerprint: &str) -> ProviderResult<Option<CacheEntry>> {
        let entries = self.entries.read().map_err(|_| poisoned("load"))?;
        Ok(entries.get(fingerprint).cloned())
    }

    fn store(&self, entry: CacheEntry) -> ProviderResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned("store"))?;
        entries.insert(entry.fingerprint.clone(), entry);
        Ok(())
    }

    fn remove(&self, fingerprint: &str) -> ProviderResult<bool> {
        let mut entries = self.entries.write().map_err(|_| poisoned("remove"))?;
        Ok(entries.remove(fingerprint).is_some())
    }

    fn clear(&self) -> ProviderResult<()> {
        self.entries.write().map_err(|_| poisoned("clear"))?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn entry(key: &str, value: i64) -> CacheEntry {
        CacheEntry::new(key, serde_json::json!(value), Duration::from_secs(60))
    }

    #[test]
    fn test_store_load_remove() {
        let backend = MemoryCacheBackend::new();
        assert!(backend.is_empty());
        assert!(backend.load("a").unwrap().is_none());

        backend.store(entry("a", 1)).unwrap();
        assert_eq!(backend.load("a").unwrap().unwrap().payload, 1);

        backend.store(entry("a", 2)).unwrap();
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.load("a").unwrap().unwrap().payload, 2);

        assert!(backend.remove("a").unwrap());
        assert!(!backend.remove("a").unwrap());
    }

    #[test]
    fn test_clear() {
        let backend = MemoryCacheBackend::new();
        backend.store(entry("a", 1)).unwrap();
        backend.store(entry("b", 2)).unwrap();
        backend.clear().unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_concurrent_writers_converge() {
        let backend = Arc::new(MemoryCacheBackend::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let backend = Arc::clone(&backend);
                std::thread::spawn(move || backend.store(entry("shared", i)).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let value = backend.load("shared").unwrap().unwrap().payload;
        assert!((0..8).any(|i| value == i));
        assert_eq!(backend.len(), 1);
    }
}
