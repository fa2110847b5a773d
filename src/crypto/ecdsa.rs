//! ECDSA keys, signatures and their fixed-width encodings
//!
//! Signatures are encoded as 32-byte big-endian R followed by 32-byte
//! big-endian S; public keys as 32-byte big-endian X followed by Y. Short
//! values are left-padded with zeros, so the serialized length never varies
//! with the numeric magnitude of the components.

use crate::crypto::SignatureAlgorithm;
use crate::errors::{Result, SealSignError};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use zeroize::Zeroizing;

/// Coordinate size in bytes for both supported curves
const COORDINATE_SIZE: usize = 32;

/// A private key bound to one of the supported curves
pub enum PrivateKey {
    P256(p256::ecdsa::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

impl PrivateKey {
    /// Generate a new random private key on the given curve
    pub fn generate(sig_algo: SignatureAlgorithm) -> Self {
        match sig_algo {
            SignatureAlgorithm::EcdsaP256 => {
                PrivateKey::P256(p256::ecdsa::SigningKey::random(&mut rand::thread_rng()))
            }
            SignatureAlgorithm::EcdsaSecp256k1 => {
                PrivateKey::Secp256k1(k256::ecdsa::SigningKey::random(&mut rand::thread_rng()))
            }
        }
    }

    /// Create from raw scalar bytes (at most 32, left-padded with zeros)
    pub fn from_bytes(bytes: &[u8], sig_algo: SignatureAlgorithm) -> Result<Self> {
        if bytes.len() > COORDINATE_SIZE {
            return Err(SealSignError::InvalidKeyFormat(format!(
                "Expected at most {} bytes, got {}",
                COORDINATE_SIZE,
                bytes.len()
            )));
        }

        let mut padded = Zeroizing::new([0u8; COORDINATE_SIZE]);
        padded[COORDINATE_SIZE - bytes.len()..].copy_from_slice(bytes);

        match sig_algo {
            SignatureAlgorithm::EcdsaP256 => {
                let key = p256::ecdsa::SigningKey::from_slice(&padded[..])
                    .map_err(|e| SealSignError::InvalidKeyFormat(e.to_string()))?;
                Ok(PrivateKey::P256(key))
            }
            SignatureAlgorithm::EcdsaSecp256k1 => {
                let key = k256::ecdsa::SigningKey::from_slice(&padded[..])
                    .map_err(|e| SealSignError::InvalidKeyFormat(e.to_string()))?;
                Ok(PrivateKey::Secp256k1(key))
            }
        }
    }

    /// Create from a hex-encoded scalar
    pub fn from_hex(hex_value: &str, sig_algo: SignatureAlgorithm) -> Result<Self> {
        let bytes = Zeroizing::new(hex::decode(hex_value)?);
        Self::from_bytes(&bytes, sig_algo)
    }

    /// Sign a 32-byte digest
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature> {
        match self {
            PrivateKey::P256(key) => {
                let signature: p256::ecdsa::Signature = key
                    .sign_prehash(digest)
                    .map_err(|e| SealSignError::SigningFailed(e.to_string()))?;
                Ok(Signature::from_slice(signature.to_bytes().as_slice()))
            }
            PrivateKey::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key
                    .sign_prehash(digest)
                    .map_err(|e| SealSignError::SigningFailed(e.to_string()))?;
                Ok(Signature::from_slice(signature.to_bytes().as_slice()))
            }
        }
    }

    /// Get the public key as fixed-width X‖Y coordinates
    pub fn public_key(&self) -> PublicKey {
        let point = match self {
            PrivateKey::P256(key) => key.verifying_key().to_encoded_point(false),
            PrivateKey::Secp256k1(key) => key.verifying_key().to_encoded_point(false),
        };

        // Uncompressed SEC1 is 0x04 || X || Y; drop the tag byte
        let mut bytes = [0u8; COORDINATE_SIZE * 2];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        PublicKey { bytes }
    }

    /// The curve this key is bound to
    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            PrivateKey::P256(_) => SignatureAlgorithm::EcdsaP256,
            PrivateKey::Secp256k1(_) => SignatureAlgorithm::EcdsaSecp256k1,
        }
    }

    /// Export the private scalar as raw bytes (use with caution!)
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        match self {
            PrivateKey::P256(key) => Zeroizing::new(key.to_bytes().to_vec()),
            PrivateKey::Secp256k1(key) => Zeroizing::new(key.to_bytes().to_vec()),
        }
    }

    /// Export the private scalar as hex
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes()))
    }
}

/// A public key as fixed-width big-endian X‖Y coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; COORDINATE_SIZE * 2],
}

impl PublicKey {
    /// Raw X‖Y bytes (always 64)
    pub fn to_bytes(&self) -> [u8; COORDINATE_SIZE * 2] {
        self.bytes
    }

    /// Hex encoding (always 128 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// A signature as fixed-width big-endian R‖S
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; COORDINATE_SIZE * 2],
}

impl Signature {
    fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = [0u8; COORDINATE_SIZE * 2];
        bytes.copy_from_slice(slice);
        Signature { bytes }
    }

    /// Raw R‖S bytes (always 64)
    pub fn to_bytes(&self) -> [u8; COORDINATE_SIZE * 2] {
        self.bytes
    }

    /// Hex encoding (always 128 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// Verify a signature against an X‖Y public key. Test-only helper; the
/// service itself never verifies, the ledger does.
#[cfg(test)]
pub(crate) fn verify(
    digest: &[u8; 32],
    signature: &Signature,
    public_key: &PublicKey,
    sig_algo: SignatureAlgorithm,
) -> bool {
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    let mut sec1 = [0u8; 65];
    sec1[0] = 0x04;
    sec1[1..].copy_from_slice(&public_key.to_bytes());

    match sig_algo {
        SignatureAlgorithm::EcdsaP256 => {
            let Ok(key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1) else {
                return false;
            };
            let Ok(sig) = p256::ecdsa::Signature::from_slice(&signature.to_bytes()) else {
                return false;
            };
            key.verify_prehash(digest, &sig).is_ok()
        }
        SignatureAlgorithm::EcdsaSecp256k1 => {
            let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1) else {
                return false;
            };
            let Ok(sig) = k256::ecdsa::Signature::from_slice(&signature.to_bytes()) else {
                return false;
            };
            key.verify_prehash(digest, &sig).is_ok()
        }
    }
}
