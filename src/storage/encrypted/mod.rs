// src/storage/encrypted/mod.rs
pub mod cipher;
pub mod errors;
mod store;

pub use cipher::StorageCipher;
pub use errors::{Result, StorageError};
pub use store::{EncryptedStore, EMBEDDINGS_COLLECTION};
