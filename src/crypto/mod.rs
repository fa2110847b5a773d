//! Cryptographic primitives
//!
//! Provides:
//! - ECDSA key generation and signing over P-256 and secp256k1
//! - Fixed-width signature and public key encodings (32-byte R‖S / X‖Y)
//! - SHA2-256 and SHA3-256 message hashing
//!
//! The algorithm set is closed: both enums are exhaustive and anything else
//! is rejected at parse time with `UnsupportedAlgorithm`.

mod ecdsa;

pub use ecdsa::{PrivateKey, PublicKey, Signature};

#[cfg(test)]
pub(crate) use ecdsa::verify;

use crate::errors::{Result, SealSignError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Sha3_256;
use std::fmt;
use std::str::FromStr;

/// Supported signature algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "ECDSA_P256")]
    EcdsaP256,
    #[serde(rename = "ECDSA_secp256k1")]
    EcdsaSecp256k1,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::EcdsaP256 => "ECDSA_P256",
            SignatureAlgorithm::EcdsaSecp256k1 => "ECDSA_secp256k1",
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SealSignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ECDSA_P256" => Ok(SignatureAlgorithm::EcdsaP256),
            "ECDSA_secp256k1" => Ok(SignatureAlgorithm::EcdsaSecp256k1),
            _ => Err(SealSignError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA2_256")]
    Sha2_256,
    #[serde(rename = "SHA3_256")]
    Sha3_256,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha2_256 => "SHA2_256",
            HashAlgorithm::Sha3_256 => "SHA3_256",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = SealSignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SHA2_256" => Ok(HashAlgorithm::Sha2_256),
            "SHA3_256" => Ok(HashAlgorithm::Sha3_256),
            _ => Err(SealSignError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hash a message, producing a 32-byte digest for either algorithm
pub fn hash(message: &[u8], hash_algo: HashAlgorithm) -> [u8; 32] {
    match hash_algo {
        HashAlgorithm::Sha2_256 => Sha256::digest(message).into(),
        HashAlgorithm::Sha3_256 => Sha3_256::digest(message).into(),
    }
}
