// src/storage/encrypted/cipher.rs
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use sha3::{Digest, Sha3_256};

use super::errors::{Result, StorageError};

const NONCE_LEN: usize = 12;

/// AES-256-GCM over the managed key. Output layout is `nonce || ciphertext`.
#[derive(Clone)]
pub struct StorageCipher {
    cipher: Aes256Gcm,
}

impl StorageCipher {
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(StorageError::KeyError("empty encryption key".to_string()));
        }

        let hash = Sha3_256::digest(key);
        let cipher_key = Key::<Aes256Gcm>::from_slice(hash.as_slice());
        let cipher = Aes256Gcm::new(cipher_key);

        Ok(Self { cipher })
    }

    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, data)
            .map_err(|e| StorageError::Encryption(e.to_string()))?;

        let mut result = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);

        Ok(result)
    }

    pub fn decrypt(&self, encrypted_data: &[u8]) -> Result<Vec<u8>> {
        if encrypted_data.len() < NONCE_LEN {
            return Err(StorageError::Decryption(
                "Invalid encrypted data length".to_string(),
            ));
        }

        let (nonce_bytes, ciphertext) = encrypted_data.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        // A wrong key surfaces here as an authentication failure
        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| StorageError::Decryption("ciphertext does not match the storage key".to_string()))
    }
}
