use super::sqlite::SqliteStore;
use super::text_log::TextLogStore;
use super::traits::AggregateStore;
use crate::config::{Config, StoreBackend};
use anyhow::Result;
use std::sync::Arc;

/// Open the configured backend.
pub async fn create_store(config: &Config) -> Result<Arc<dyn AggregateStore>> {
    let store: Arc<dyn AggregateStore> = match config.store.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&config.database_path()).await?),
        StoreBackend::TextLog => Arc::new(TextLogStore::open(&config.rating_log_path()).await?),
    };
    tracing::info!(backend = store.name(), "aggregate store ready");
    Ok(store)
}
