//! Transaction-signing authorizations
//!
//! An `Authorization` binds an account address, a leased key index and a
//! signer into the capability the ledger requires for each transaction role
//! (proposer, payer, authorizer). It is pure composition over the pieces it
//! is built from: no state, no I/O, and a lifetime of one dispatch.

use crate::crypto::Signature;
use crate::errors::Result;
use crate::keys::Signer;
use crate::ledger::with_prefix;

/// A signing capability for one (address, key index) pair
#[derive(Clone)]
pub struct Authorization {
    address: String,
    key_index: u32,
    signer: Signer,
}

impl Authorization {
    /// Compose an address, a leased key index and a signer
    pub fn new(address: &str, key_index: u32, signer: Signer) -> Self {
        Self {
            address: with_prefix(address),
            key_index,
            signer,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn key_index(&self) -> u32 {
        self.key_index
    }

    /// Sign a canonical payload, yielding the account signature the ledger
    /// attaches to the transaction
    pub fn sign(&self, message: &[u8]) -> Result<AccountSignature> {
        Ok(AccountSignature {
            address: self.address.clone(),
            key_index: self.key_index,
            signature: self.signer.sign(message)?,
        })
    }
}

/// A signature bound to the account and key index that produced it
#[derive(Debug, Clone)]
pub struct AccountSignature {
    pub address: String,
    pub key_index: u32,
    pub signature: Signature,
}

impl AccountSignature {
    /// Wire form of the signature: 128 hex characters, always
    pub fn signature_hex(&self) -> String {
        self.signature.to_hex()
    }
}
