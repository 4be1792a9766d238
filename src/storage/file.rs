// src/storage/file.rs
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    encrypted::{Result, StorageCipher, StorageError},
    run_blocking,
    types::StorageBackend,
    EmbeddingStore,
};
use crate::core::identity::types::FaceEmbedding;

type EmbeddingMap = HashMap<String, FaceEmbedding>;

/// Whole-map backend: the username -> embedding map is serialized to JSON and
/// encrypted as a single blob.
///
/// Every save rewrites the full file. The mutex only orders writers inside
/// this process; other processes writing the same file will race.
pub struct FileEmbeddingStore {
    path: PathBuf,
    cipher: StorageCipher,
    write_lock: Mutex<()>,
}

impl FileEmbeddingStore {
    pub fn new<P: Into<PathBuf>>(path: P, cipher: StorageCipher) -> Self {
        Self {
            path: path.into(),
            cipher,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_map(&self) -> Result<EmbeddingMap> {
        let (path, cipher) = (self.path.clone(), self.cipher.clone());
        run_blocking(move || read_map(&path, &cipher)).await
    }
}

fn read_map(path: &Path, cipher: &StorageCipher) -> Result<EmbeddingMap> {
    let encrypted = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => {
            return Err(StorageError::Unavailable(format!(
                "cannot read {:?}: {}",
                path, e
            )))
        }
    };

    let decrypted = cipher.decrypt(&encrypted)?;
    Ok(serde_json::from_slice(&decrypted)?)
}

fn write_map(path: &Path, cipher: &StorageCipher, map: &EmbeddingMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let serialized = serde_json::to_vec(map)?;
    let encrypted = cipher.encrypt(&serialized)?;

    // Write beside the target and rename so readers never see a partial file
    let mut staging = path.to_path_buf().into_os_string();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, encrypted)?;
    fs::rename(&staging, path)?;
    Ok(())
}

#[async_trait]
impl EmbeddingStore for FileEmbeddingStore {
    async fn save_embedding(&self, username: &str, embedding: &FaceEmbedding) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let (path, cipher) = (self.path.clone(), self.cipher.clone());
        let (key, embedding) = (username.to_string(), embedding.clone());
        let records = run_blocking(move || {
            let mut map = read_map(&path, &cipher)?;
            map.insert(key, embedding);
            write_map(&path, &cipher, &map)?;
            Ok(map.len())
        })
        .await?;

        debug!("Saved embedding for {} ({} records in {:?})", username, records, self.path);
        Ok(())
    }

    async fn load_embeddings(&self) -> Result<EmbeddingMap> {
        self.load_map().await
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path, key: u8) -> FileEmbeddingStore {
        FileEmbeddingStore::new(
            dir.join("data").join("embeddings.json"),
            StorageCipher::new(&[key; 32]).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp_dir = tempdir().unwrap();
        let store = store_in(temp_dir.path(), 1);

        assert!(store.load_embeddings().await.unwrap().is_empty());
        assert!(store.load_embedding("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = tempdir().unwrap();
        let store = store_in(temp_dir.path(), 1);

        store.save_embedding("alice", &vec![0.25, -0.5]).await.unwrap();
        store.save_embedding("bob", &vec![0.75, 0.5]).await.unwrap();
        store.save_embedding("alice", &vec![0.1, 0.2]).await.unwrap();

        let all = store.load_embeddings().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["alice"], vec![0.1, 0.2]);
        assert_eq!(all["bob"], vec![0.75, 0.5]);
    }

    #[tokio::test]
    async fn test_file_holds_no_plaintext() {
        let temp_dir = tempdir().unwrap();
        let store = store_in(temp_dir.path(), 1);
        store.save_embedding("alice", &vec![0.987654]).await.unwrap();

        let raw = std::fs::read(store.path()).unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(!text.contains("alice"));
        assert!(!text.contains("0.987654"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_saves_keep_every_record() {
        let temp_dir = tempdir().unwrap();
        let store = std::sync::Arc::new(store_in(temp_dir.path(), 1));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .save_embedding(&format!("user-{}", i), &vec![i as f64])
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all = store.load_embeddings().await.unwrap();
        assert_eq!(all.len(), 8);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_key_mismatch_is_decryption_error() {
        let temp_dir = tempdir().unwrap();
        store_in(temp_dir.path(), 1)
            .save_embedding("alice", &vec![1.0])
            .await
            .unwrap();

        let result = store_in(temp_dir.path(), 9).load_embeddings().await;
        assert!(matches!(result, Err(StorageError::Decryption(_))));
    }
}
