// src/storage/types.rs
use serde::{Deserialize, Serialize};

/// Which persistence backend holds the embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One encrypted file holding the whole username -> embedding map.
    File,
    /// One document per username in the `embeddings` collection.
    Document,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => f.write_str("file"),
            StorageBackend::Document => f.write_str("document"),
        }
    }
}

/// Shape of a document in the `embeddings` collection. `encoding` is the
/// base64 of the encrypted JSON embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingDocument {
    pub username: String,
    pub encoding: String,
}
