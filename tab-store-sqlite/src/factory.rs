use async_trait::async_trait;
use tab_core::store::{StoreConfig, StoreFactory};
use tab_core::{KeyValueStore, StoreError};

use crate::store::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`tab_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use tab_core::store::StoreRegistry;
/// use tab_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database named by `config.location` and bring its schema up
    /// to date.
    ///
    /// Accepted locations:
    /// * A bare file path, e.g. `"table-tab.db"`. Created if missing.
    /// * `":memory:"`, an ephemeral in-memory database.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteStore::open(&config.location)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Database(format!("{e:#}")))?;
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use tab_core::ENTRIES_KEY;
    use tab_core::store::{StoreConfig, StoreFactory};

    use super::SqliteStoreFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn creates_migrated_in_memory_store() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            location: ":memory:".to_string(),
        };

        let store = SqliteStoreFactory
            .create(&config)
            .await
            .expect("failed to create in-memory store");

        assert_eq!(store.get(ENTRIES_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn unopenable_path_is_connection_error() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            location: "/nonexistent-dir/definitely/missing/tab.db".to_string(),
        };

        let result = SqliteStoreFactory.create(&config).await;

        assert!(matches!(result, Err(tab_core::StoreError::Connection(_))));
    }
}
