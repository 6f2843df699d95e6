//! Cryptographic operations for notebook encryption.
//!
//! This module turns a passphrase into a notebook key and seals/opens notebook
//! payloads with AES-256-GCM. Every seal draws a fresh random nonce and prefixes
//! it to the ciphertext, so a sealed blob is self-contained.
//!
//! # Module Structure
//!
//! - `key`: Passphrase to key derivation
//! - `cipher`: Authenticated encryption and decryption of byte payloads
//!
//! # Example
//!
//! ```
//! use eno::crypto::{derive_key, open, seal};
//!
//! let key = derive_key("correct horse battery staple");
//! let sealed = seal(&key, b"Secret notebook content")?;
//! let opened = open(&key, &sealed)?;
//! assert_eq!(opened, b"Secret notebook content");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cipher;
pub mod key;

// Re-export commonly used types
pub use self::cipher::{open, seal, NONCE_SIZE, TAG_SIZE};
pub use self::key::{derive_key, NotebookKey, KEY_SIZE};
