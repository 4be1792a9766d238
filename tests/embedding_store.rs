// tests/embedding_store.rs
mod common;

use std::{fs, sync::Arc};

use biovault::{
    core::crypto::KeyManager,
    storage::{
        encrypted::StorageError, open_store, EmbeddingCache, EmbeddingStore, StorageBackend,
    },
};
use tempfile::tempdir;

fn embedding(seed: f64) -> Vec<f64> {
    (0..128).map(|i| seed + i as f64 / 1000.0).collect()
}

async fn persists_across_reopen(backend: StorageBackend) {
    let temp_dir = tempdir().unwrap();
    let config = common::config(temp_dir.path(), backend);

    {
        let store = open_store(&config.storage).unwrap();
        assert_eq!(store.backend(), backend);
        store.save_embedding("alice", &embedding(0.1)).await.unwrap();
        store.save_embedding("bob", &embedding(0.2)).await.unwrap();
        store.flush().await.unwrap();
    }

    let store = open_store(&config.storage).unwrap();
    let all = store.load_embeddings().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["alice"], embedding(0.1));
    assert_eq!(store.load_embedding("bob").await.unwrap(), Some(embedding(0.2)));
    assert_eq!(store.load_embedding("carol").await.unwrap(), None);
}

#[tokio::test]
async fn test_file_backend_persists_across_reopen() {
    persists_across_reopen(StorageBackend::File).await;
}

#[tokio::test]
async fn test_document_backend_persists_across_reopen() {
    persists_across_reopen(StorageBackend::Document).await;
}

#[tokio::test]
async fn test_first_open_generates_key_once() {
    let temp_dir = tempdir().unwrap();
    let config = common::config(temp_dir.path(), StorageBackend::File);

    assert!(!config.storage.key_path.exists());
    open_store(&config.storage).unwrap();
    let first = fs::read_to_string(&config.storage.key_path).unwrap();

    open_store(&config.storage).unwrap();
    let second = fs::read_to_string(&config.storage.key_path).unwrap();
    assert_eq!(first, second);

    KeyManager::open(&config.storage.key_path).unwrap().cipher().unwrap();
}

#[tokio::test]
async fn test_file_backend_is_encrypted_at_rest() {
    let temp_dir = tempdir().unwrap();
    let config = common::config(temp_dir.path(), StorageBackend::File);

    let store = open_store(&config.storage).unwrap();
    store.save_embedding("alice", &embedding(0.5)).await.unwrap();

    // Long enough that random ciphertext cannot contain it by chance
    let serialized = serde_json::to_string(&embedding(0.5)).unwrap();
    let marker = &serialized[..serialized.len().min(24)];

    let raw = fs::read(config.storage.data_dir.join(&config.storage.file_name)).unwrap();
    let as_text = String::from_utf8_lossy(&raw);
    assert!(!as_text.contains("alice"));
    assert!(!as_text.contains(marker));
}

#[tokio::test]
async fn test_replaced_key_cannot_read_old_data() {
    let temp_dir = tempdir().unwrap();
    let config = common::config(temp_dir.path(), StorageBackend::File);

    let store = open_store(&config.storage).unwrap();
    store.save_embedding("alice", &embedding(0.3)).await.unwrap();
    drop(store);

    fs::remove_file(&config.storage.key_path).unwrap();
    let store = open_store(&config.storage).unwrap();

    let result = store.load_embeddings().await;
    assert!(matches!(result, Err(StorageError::Decryption(_))));
}

#[tokio::test]
async fn test_corrupt_key_file_is_key_error() {
    let temp_dir = tempdir().unwrap();
    let config = common::config(temp_dir.path(), StorageBackend::Document);

    fs::create_dir_all(config.storage.key_path.parent().unwrap()).unwrap();
    fs::write(&config.storage.key_path, "c2hvcnQ=").unwrap();

    assert!(matches!(
        open_store(&config.storage),
        Err(StorageError::KeyError(_))
    ));
}

#[tokio::test]
async fn test_cache_sees_external_writes_after_refresh() {
    let temp_dir = tempdir().unwrap();
    let config = common::config(temp_dir.path(), StorageBackend::File);

    let store = open_store(&config.storage).unwrap();
    let cache = EmbeddingCache::new(store.clone());
    assert!(cache.lookup("alice").await.unwrap().is_none());

    // Another process writing the same file
    let other: Arc<dyn EmbeddingStore> = open_store(&config.storage).unwrap();
    other.save_embedding("alice", &embedding(0.7)).await.unwrap();

    assert!(cache.lookup("alice").await.unwrap().is_none());
    cache.refresh().await.unwrap();
    assert_eq!(cache.lookup("alice").await.unwrap(), Some(embedding(0.7)));
}
