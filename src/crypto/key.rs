//! Passphrase to key derivation.
//!
//! The notebook key is the SHA-256 digest of the UTF-8 passphrase. There is no
//! salt and no work factor: the same passphrase always yields the same key, so
//! a notebook is exactly as strong as its passphrase.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of notebook keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// A derived notebook key, zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NotebookKey {
    bytes: [u8; KEY_SIZE],
}

impl NotebookKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for NotebookKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotebookKey")
            .field("bytes", &crate::constants::REDACTED_PLACEHOLDER)
            .finish()
    }
}

/// Derives the notebook key for a passphrase.
///
/// Length policy is enforced by the store before this is called.
pub fn derive_key(passphrase: &str) -> NotebookKey {
    let digest = Sha256::digest(passphrase.as_bytes());
    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(digest.as_slice());
    NotebookKey::from_bytes(bytes)
}
