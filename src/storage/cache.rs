// src/storage/cache.rs
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;
use tracing::debug;

use super::{encrypted::Result, EmbeddingStore};
use crate::core::identity::types::FaceEmbedding;

type Snapshot = Arc<HashMap<String, FaceEmbedding>>;

/// Refreshable snapshot of the store contents.
///
/// Writes made through the cache invalidate the snapshot; writes made by
/// other processes show up after `refresh()`.
pub struct EmbeddingCache {
    store: Arc<dyn EmbeddingStore>,
    snapshot: RwLock<Option<Snapshot>>,
    generation: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(store: Arc<dyn EmbeddingStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the cached map, loading it from the store if needed.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let cached = self.snapshot.read().clone();
        if let Some(snapshot) = cached {
            return Ok(snapshot);
        }
        self.load().await
    }

    pub async fn lookup(&self, username: &str) -> Result<Option<FaceEmbedding>> {
        Ok(self.snapshot().await?.get(username).cloned())
    }

    /// Writes through to the store, then drops the snapshot.
    pub async fn save_embedding(&self, username: &str, embedding: &FaceEmbedding) -> Result<()> {
        self.store.save_embedding(username, embedding).await?;
        self.invalidate();
        Ok(())
    }

    pub async fn refresh(&self) -> Result<Snapshot> {
        self.invalidate();
        self.load().await
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.snapshot.write() = None;
    }

    async fn load(&self) -> Result<Snapshot> {
        let generation = self.generation.load(Ordering::SeqCst);
        let loaded: Snapshot = Arc::new(self.store.load_embeddings().await?);

        // Only publish if no write invalidated the cache while we were loading
        let mut slot = self.snapshot.write();
        if self.generation.load(Ordering::SeqCst) == generation {
            *slot = Some(loaded.clone());
        }
        debug!("Loaded {} embeddings into cache", loaded.len());
        Ok(loaded)
    }
}
