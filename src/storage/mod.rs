// src/storage/mod.rs
pub mod cache;
pub mod encrypted;
pub mod file;
pub mod types;

use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use tracing::info;

use crate::{
    core::{crypto::KeyManager, identity::types::FaceEmbedding},
    utils::config::StorageConfig,
};
use encrypted::{EncryptedStore, Result, StorageError};

pub use cache::EmbeddingCache;
pub use file::FileEmbeddingStore;
pub use types::StorageBackend;

/// Username -> embedding persistence, encrypted at rest.
///
/// Saving a username that already has an embedding overwrites it. Nothing
/// here serializes concurrent writers to the same username.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    async fn save_embedding(&self, username: &str, embedding: &FaceEmbedding) -> Result<()>;

    async fn load_embeddings(&self) -> Result<HashMap<String, FaceEmbedding>>;

    async fn load_embedding(&self, username: &str) -> Result<Option<FaceEmbedding>> {
        Ok(self.load_embeddings().await?.remove(username))
    }

    fn backend(&self) -> StorageBackend;

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Runs blocking store work (RocksDB calls, whole-blob crypto and file I/O)
/// on tokio's blocking pool so it never stalls an async worker.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))?
}

/// Opens the configured backend. A backend that cannot be opened is an
/// error; there is no fallback to the other one.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn EmbeddingStore>> {
    let key_manager = KeyManager::open(&config.key_path)?;
    let cipher = key_manager.cipher()?;

    let store: Arc<dyn EmbeddingStore> = match config.backend {
        StorageBackend::File => {
            let path = Path::new(&config.data_dir).join(&config.file_name);
            Arc::new(FileEmbeddingStore::new(path, cipher))
        }
        StorageBackend::Document => Arc::new(EncryptedStore::open(&config.db_path, cipher)?),
    };

    info!("Embedding store ready (backend: {})", store.backend());
    Ok(store)
}
