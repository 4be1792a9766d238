// src/storage/encrypted/store.rs
use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rocksdb::{ColumnFamily, IteratorMode, Options, DB};
use tracing::{debug, info};

use super::{cipher::StorageCipher, errors::*};
use crate::{
    core::identity::types::FaceEmbedding,
    storage::{
        run_blocking,
        types::{EmbeddingDocument, StorageBackend},
        EmbeddingStore,
    },
};

pub const EMBEDDINGS_COLLECTION: &str = "embeddings";

/// Document-collection backend: one RocksDB entry per username in the
/// `embeddings` column family. A write only touches its own document.
///
/// Every RocksDB call runs on the blocking pool.
pub struct EncryptedStore {
    collection: Arc<Collection>,
}

struct Collection {
    db: DB,
    cipher: StorageCipher,
}

impl EncryptedStore {
    pub fn open<P: AsRef<Path>>(path: P, cipher: StorageCipher) -> Result<Self> {
        let path = path.as_ref();

        // Create directory if it doesn't exist
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| {
                StorageError::Unavailable(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_keep_log_file_num(10);

        let db = DB::open_cf(&opts, path, [EMBEDDINGS_COLLECTION])
            .map_err(|e| StorageError::Unavailable(format!("Failed to open database: {}", e)))?;

        info!("Opened embeddings collection at {:?}", path);
        Ok(Self {
            collection: Arc::new(Collection { db, cipher }),
        })
    }

    async fn with_collection<T, F>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Collection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let collection = self.collection.clone();
        run_blocking(move || task(&collection)).await
    }
}

impl Collection {
    fn handle(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(EMBEDDINGS_COLLECTION).ok_or_else(|| {
            StorageError::Unavailable(format!("missing collection {}", EMBEDDINGS_COLLECTION))
        })
    }

    fn seal(&self, username: &str, embedding: &FaceEmbedding) -> Result<Vec<u8>> {
        let serialized = serde_json::to_vec(embedding)?;
        let encrypted = self.cipher.encrypt(&serialized)?;

        let document = EmbeddingDocument {
            username: username.to_string(),
            encoding: STANDARD.encode(encrypted),
        };
        Ok(serde_json::to_vec(&document)?)
    }

    fn open_document(&self, raw: &[u8]) -> Result<(String, FaceEmbedding)> {
        let document: EmbeddingDocument = serde_json::from_slice(raw)?;
        let encrypted = STANDARD
            .decode(&document.encoding)
            .map_err(|e| StorageError::InvalidFormat(format!("encoding is not base64: {}", e)))?;

        let decrypted = self.cipher.decrypt(&encrypted)?;
        let embedding = serde_json::from_slice(&decrypted)?;
        Ok((document.username, embedding))
    }

    fn put(&self, username: &str, embedding: &FaceEmbedding) -> Result<()> {
        let document = self.seal(username, embedding)?;
        self.db.put_cf(self.handle()?, username.as_bytes(), document)?;
        Ok(())
    }

    fn get(&self, username: &str) -> Result<Option<FaceEmbedding>> {
        match self.db.get_cf(self.handle()?, username.as_bytes())? {
            Some(raw) => Ok(Some(self.open_document(&raw)?.1)),
            None => Ok(None),
        }
    }

    fn all(&self) -> Result<HashMap<String, FaceEmbedding>> {
        let mut embeddings = HashMap::new();

        for item in self.db.iterator_cf(self.handle()?, IteratorMode::Start) {
            let (_key, raw) = item?;
            let (username, embedding) = self.open_document(&raw)?;
            embeddings.insert(username, embedding);
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingStore for EncryptedStore {
    async fn save_embedding(&self, username: &str, embedding: &FaceEmbedding) -> Result<()> {
        let key = username.to_string();
        let embedding = embedding.clone();
        self.with_collection(move |c| c.put(&key, &embedding)).await?;

        debug!("Upserted embedding document for {}", username);
        Ok(())
    }

    async fn load_embeddings(&self) -> Result<HashMap<String, FaceEmbedding>> {
        self.with_collection(|c| c.all()).await
    }

    async fn load_embedding(&self, username: &str) -> Result<Option<FaceEmbedding>> {
        let username = username.to_string();
        self.with_collection(move |c| c.get(&username)).await
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Document
    }

    async fn flush(&self) -> Result<()> {
        self.with_collection(|c| Ok(c.db.flush_cf(c.handle()?)?)).await
    }
}
