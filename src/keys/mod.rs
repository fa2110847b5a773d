//! Key management
//!
//! Serializes and deserializes private key material, optionally encrypting it
//! at rest. A `KeyManager` is configured once per pool with the signature and
//! hash algorithms its keys use; `save`/`load` round-trip keys through the
//! persisted string format (plain hex, or AES-256-CTR ciphertext when an
//! encryption key is configured).

pub mod encryption;

use crate::crypto::{hash, HashAlgorithm, PrivateKey, PublicKey, Signature, SignatureAlgorithm};
use crate::errors::Result;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

/// A signing key together with the hash algorithm it signs under
pub struct Key {
    private_key: PrivateKey,
    hash_algo: HashAlgorithm,
}

impl Key {
    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.private_key.algorithm()
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algo
    }
}

/// Hash-then-sign capability over a single key
#[derive(Clone)]
pub struct Signer {
    key: Arc<Key>,
}

impl Signer {
    pub fn new(key: Arc<Key>) -> Self {
        Self { key }
    }

    /// Hash the message with the key's hash algorithm and sign the digest
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let digest = hash(message, self.key.hash_algo);
        self.key.private_key.sign(&digest)
    }
}

/// Generates, persists and restores signing keys for one pool
pub struct KeyManager {
    sig_algo: SignatureAlgorithm,
    hash_algo: HashAlgorithm,
    encryption_key: Option<[u8; 32]>,
}

impl KeyManager {
    /// Create a manager that stores keys as plain hex
    pub fn new(sig_algo: SignatureAlgorithm, hash_algo: HashAlgorithm) -> Self {
        Self {
            sig_algo,
            hash_algo,
            encryption_key: None,
        }
    }

    /// Create a manager that encrypts keys at rest
    pub fn with_encryption_key(
        sig_algo: SignatureAlgorithm,
        hash_algo: HashAlgorithm,
        encryption_key: [u8; 32],
    ) -> Self {
        Self {
            sig_algo,
            hash_algo,
            encryption_key: Some(encryption_key),
        }
    }

    /// Generate a new key on the configured curve
    pub fn generate(&self) -> Key {
        debug!(sig_algo = %self.sig_algo, "Generating signing key");
        Key {
            private_key: PrivateKey::generate(self.sig_algo),
            hash_algo: self.hash_algo,
        }
    }

    /// Serialize a key for persistence
    ///
    /// Output is the hex-encoded private scalar, encrypted when an encryption
    /// key is configured.
    pub fn save(&self, key: &Key) -> Result<String> {
        let hex_value = key.private_key.to_hex();

        match &self.encryption_key {
            Some(encryption_key) => encryption::encrypt(encryption_key, &hex_value),
            None => Ok(hex_value.to_string()),
        }
    }

    /// Restore a key from its persisted form
    pub fn load(&self, value: &str) -> Result<Key> {
        let hex_value = match &self.encryption_key {
            Some(encryption_key) => encryption::decrypt(encryption_key, value)?,
            None => Zeroizing::new(value.to_string()),
        };

        let private_key = PrivateKey::from_hex(&hex_value, self.sig_algo)?;
        Ok(Key {
            private_key,
            hash_algo: self.hash_algo,
        })
    }
}
