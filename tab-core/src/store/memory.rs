use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

/// Process-local store. Contents vanish with the process, so this is the
/// session-only fallback and the store used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// [`StoreFactory`] for the `"memory"` backend. The location is ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("entradas").await, Ok(None));
    }

    #[tokio::test]
    async fn set_then_get_returns_latest_value() {
        let store = MemoryStore::new();
        store.set("entradas", "[]").await.unwrap();
        store.set("entradas", "[1]").await.unwrap();

        assert_eq!(store.get("entradas").await, Ok(Some("[1]".to_string())));
    }

    #[test]
    fn backend_name_is_memory() {
        assert_eq!(MemoryStoreFactory.backend_name(), "memory");
    }
}
