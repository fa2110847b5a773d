//! Account authorization and creation
//!
//! Ties the subsystem together for one request: lease the least-recently-used
//! key index for the account, load that key's material, and compose the
//! signing capability the dispatcher hands to the ledger client. The
//! [`creation`] submodule provisions new accounts on the ledger.

pub mod creation;

use crate::crypto::{HashAlgorithm, SignatureAlgorithm};
use crate::errors::Result;
use crate::keys::{KeyManager, Signer};
use crate::lease::LeaseStore;
use crate::ledger::Authorization;
use std::sync::Arc;
use tracing::debug;

/// A custodial account whose keys this service holds
#[derive(Debug, Clone)]
pub struct Account {
    pub address: String,
    pub sig_algo: SignatureAlgorithm,
    pub hash_algo: HashAlgorithm,
}

/// Produces per-transaction authorizations backed by leased keys
pub struct AuthorizationProvider<S> {
    store: Arc<S>,
    key_manager: KeyManager,
}

impl<S: LeaseStore> AuthorizationProvider<S> {
    pub fn new(store: Arc<S>, key_manager: KeyManager) -> Self {
        Self { store, key_manager }
    }

    /// Lease a key for the account and wrap it in an authorization
    ///
    /// The lease itself is the concurrency guard; the returned authorization
    /// is expected to live for exactly one dispatch.
    pub async fn authorize(&self, account: &Account) -> Result<Authorization> {
        let key_index = self.store.lease_key(&account.address).await?;
        let record = self.store.get_key(&account.address, key_index).await?;

        let key = Arc::new(self.key_manager.load(&record.encrypted_value)?);

        debug!(address = %account.address, key_index, "Built authorization");
        Ok(Authorization::new(&account.address, key_index, Signer::new(key)))
    }
}
