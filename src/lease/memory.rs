//! In-memory lease store
//!
//! Backs the lease contract with a mutex-guarded pool. Suitable for tests and
//! single-instance deployments; multi-instance deployments need the Postgres
//! store, since only the database can arbitrate between processes.

use crate::errors::{Result, SealSignError};
use crate::lease::{KeyRecord, LeaseStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

struct Pools {
    records: HashMap<String, Vec<KeyRecord>>,
    /// Timestamp of the most recent grant. The wall clock may not advance
    /// between two grants; leases are stamped strictly after this so
    /// `last_used_at` ordering stays unambiguous.
    last_grant: DateTime<Utc>,
}

/// Mutex-guarded lease store
pub struct MemoryLeaseStore {
    pools: Mutex<Pools>,
}

impl MemoryLeaseStore {
    pub fn new() -> Self {
        Self {
            pools: Mutex::new(Pools {
                records: HashMap::new(),
                last_grant: DateTime::<Utc>::MIN_UTC,
            }),
        }
    }

    /// Add a key to an account's pool
    pub fn add_key(&self, account_id: &str, key_index: u32, encrypted_value: &str) {
        let mut pools = self.pools.lock().unwrap();
        pools
            .records
            .entry(account_id.to_string())
            .or_default()
            .push(KeyRecord {
                account_id: account_id.to_string(),
                key_index,
                encrypted_value: encrypted_value.to_string(),
                last_used_at: DateTime::<Utc>::MIN_UTC,
            });
        debug!(account_id, key_index, "Added key to pool");
    }

    /// Number of keys configured for an account
    pub fn pool_size(&self, account_id: &str) -> usize {
        let pools = self.pools.lock().unwrap();
        pools.records.get(account_id).map_or(0, Vec::len)
    }
}

impl Default for MemoryLeaseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaseStore for MemoryLeaseStore {
    async fn lease_key(&self, account_id: &str) -> Result<u32> {
        // The whole read-modify-write happens under one lock acquisition
        let mut pools = self.pools.lock().unwrap();

        let now = std::cmp::max(Utc::now(), pools.last_grant + Duration::microseconds(1));

        let records = pools
            .records
            .get_mut(account_id)
            .filter(|records| !records.is_empty())
            .ok_or_else(|| SealSignError::LeaseExhausted {
                account: account_id.to_string(),
            })?;

        let record = records
            .iter_mut()
            .min_by_key(|record| (record.last_used_at, record.key_index))
            .expect("pool checked non-empty");

        record.last_used_at = now;
        let key_index = record.key_index;
        pools.last_grant = now;

        debug!(account_id, key_index, "Leased signing key");
        Ok(key_index)
    }

    async fn get_key(&self, account_id: &str, key_index: u32) -> Result<KeyRecord> {
        let pools = self.pools.lock().unwrap();
        pools
            .records
            .get(account_id)
            .and_then(|records| records.iter().find(|r| r.key_index == key_index))
            .cloned()
            .ok_or_else(|| {
                SealSignError::Storage(format!(
                    "No key record for account {} index {}",
                    account_id, key_index
                ))
            })
    }
}
