use std::sync::Arc;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::store::{
    memory::MemoryStore, postgres::PgStore, Document, DocumentStore, Documents,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match config.database_url.as_deref() {
            Some(url) => {
                Arc::new(PgStore::connect(url, config.db_max_connections).await?) as Arc<dyn DocumentStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
                Arc::new(MemoryStore::new()) as Arc<dyn DocumentStore>
            }
        };
        tracing::info!(backend = store.backend_name(), "store ready");

        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// In-memory store with test JWT settings.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(AppConfig::for_tests()),
        )
    }

    /// One caller's slice of collection `D`.
    pub fn documents<D: Document>(&self, owner_id: Uuid) -> Documents<'_, D> {
        Documents::new(self.store.as_ref(), owner_id)
    }
}
