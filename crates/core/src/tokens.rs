//! Sealing of provider access tokens at rest.
//!
//! Integration access tokens are stored AES-256-GCM sealed and unsealed
//! just in time for an outbound call; the plaintext is never persisted.
//! Blob layout: 12-byte random nonce followed by the ciphertext.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

use crate::error::CoreError;

/// Nonce length for AES-GCM.
const NONCE_LEN: usize = 12;

/// Key material for sealing/unsealing tokens.
#[derive(Clone)]
pub struct SealKey([u8; 32]);

impl SealKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string (the `TOKEN_SEAL_KEY` env format).
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        let hex = hex.trim();
        if hex.len() != 64 {
            return Err(CoreError::Crypto(format!(
                "seal key must be 64 hex characters, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| CoreError::Crypto("seal key is not valid hex".into()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| CoreError::Crypto("seal key is not valid hex".into()))?;
        }
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for SealKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("SealKey(..)")
    }
}

/// Seal a plaintext access token for storage.
pub fn seal_token(key: &SealKey, plaintext: &str) -> Result<Vec<u8>, CoreError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CoreError::Crypto("token sealing failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Unseal a stored token blob back to the plaintext access token.
pub fn unseal_token(key: &SealKey, blob: &[u8]) -> Result<String, CoreError> {
    if blob.len() <= NONCE_LEN {
        return Err(CoreError::Crypto("sealed token blob is too short".into()));
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CoreError::Crypto("token unsealing failed".into()))?;

    String::from_utf8(plaintext)
        .map_err(|_| CoreError::Crypto("unsealed token is not valid UTF-8".into()))
}
