//! Notebook payload encryption using AES-256-GCM.
//!
//! A sealed blob is `nonce || ciphertext || tag`. No associated data is bound.

use crate::crypto::key::NotebookKey;
use crate::errors::{AppResult, CryptoError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

/// Size of nonce in bytes (96 bits for AES-GCM).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypts `plaintext` under `key` with a freshly generated nonce.
///
/// Returns the nonce followed by the ciphertext and tag as a single blob.
///
/// # Example
///
/// ```
/// use eno::crypto::{derive_key, seal, NONCE_SIZE, TAG_SIZE};
///
/// let key = derive_key("my-secret-passphrase");
/// let sealed = seal(&key, b"hello")?;
/// assert_eq!(sealed.len(), NONCE_SIZE + 5 + TAG_SIZE);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn seal(key: &NotebookKey, plaintext: &[u8]) -> AppResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Authenticates and decrypts a blob produced by [`seal`].
///
/// Fails with `CryptoError::AuthenticationFailed` when the tag does not verify,
/// whether because the key is wrong or the blob was altered.
pub fn open(key: &NotebookKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::Truncated {
            expected: NONCE_SIZE + TAG_SIZE,
            actual: sealed.len(),
        });
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
