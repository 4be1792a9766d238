// src/core/crypto/key_manager.rs
use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, info};

use crate::storage::encrypted::{
    cipher::StorageCipher,
    errors::{Result, StorageError},
};

pub const KEY_LEN: usize = 32;

/// Owns the single process-wide storage key kept at `path`.
///
/// The key is generated once and never rotated. Two processes racing on the
/// first run can each write a key; the last write wins.
pub struct KeyManager {
    path: PathBuf,
    key: Vec<u8>,
}

impl KeyManager {
    /// Ensures the key file exists and loads it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_key(&path)?;
        let key = load_key(&path)?;

        Ok(Self { path, key })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cipher(&self) -> Result<StorageCipher> {
        StorageCipher::new(&self.key)
    }
}

/// Writes a fresh random key to `path` unless one is already there.
/// Returns whether a key was generated.
pub fn ensure_key(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    fs::write(path, URL_SAFE.encode(key))?;

    info!("Generated new storage key at {:?}", path);
    Ok(true)
}

pub fn load_key(path: &Path) -> Result<Vec<u8>> {
    let encoded = fs::read_to_string(path)
        .map_err(|e| StorageError::KeyError(format!("cannot read key file {:?}: {}", path, e)))?;

    let key = URL_SAFE
        .decode(encoded.trim())
        .map_err(|e| StorageError::KeyError(format!("key file {:?} is not valid base64: {}", path, e)))?;

    if key.len() != KEY_LEN {
        return Err(StorageError::KeyError(format!(
            "key file {:?} holds {} bytes, expected {}",
            path,
            key.len(),
            KEY_LEN
        )));
    }

    debug!("Loaded storage key from {:?}", path);
    Ok(key)
}
