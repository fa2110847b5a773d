//! Key leasing
//!
//! A ledger account carries a pool of signing keys, each with its own
//! sequence-number slot. Two in-flight transactions holding the same
//! `(account, key index)` pair collide on that slot and the ledger rejects
//! one of them. The lease store makes that collision structurally impossible:
//! selecting the least-recently-used key and stamping its `last_used_at` is a
//! single indivisible operation against the backing store, so concurrent
//! requests can never observe the same "least recent" row before either has
//! updated it. No in-process locking is involved, which keeps the guarantee
//! intact across multiple service instances sharing one database.

pub mod memory;
pub mod postgres;

pub use memory::MemoryLeaseStore;
pub use postgres::PgLeaseStore;

use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One signing key in an account's pool, as persisted
#[derive(Debug, Clone)]
pub struct KeyRecord {
    pub account_id: String,
    /// Unique within the account's pool
    pub key_index: u32,
    /// Key material in the `KeyManager` persisted format
    pub encrypted_value: String,
    /// Monotonically non-decreasing; stamped atomically on lease
    pub last_used_at: DateTime<Utc>,
}

/// Atomic least-recently-used key selection, scoped per account
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Lease the least-recently-used key index for an account
    ///
    /// Selects the record with the minimal `last_used_at` (ties broken by
    /// lowest index) and sets its `last_used_at` to the current time in the
    /// same atomic step. Fails with `LeaseExhausted` when the account has no
    /// configured keys.
    async fn lease_key(&self, account_id: &str) -> Result<u32>;

    /// Fetch the persisted record for a leased index
    async fn get_key(&self, account_id: &str, key_index: u32) -> Result<KeyRecord>;
}
