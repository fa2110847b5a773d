//! Postgres-backed lease store
//!
//! Delegates atomicity to the database: one `UPDATE ... RETURNING` statement
//! selects the least-recently-used row and stamps it in the same operation,
//! so the guarantee holds across any number of service instances sharing the
//! pool. `FOR UPDATE SKIP LOCKED` keeps concurrent leases from blocking on
//! (or double-selecting) a row already claimed in an uncommitted transaction;
//! when every row in the pool is momentarily locked, the lease retries after
//! a short pause rather than failing.
//!
//! Expected schema (migrations are managed outside this crate):
//!
//! ```sql
//! CREATE TABLE account_keys (
//!     account_id      text        NOT NULL,
//!     key_index       integer     NOT NULL,
//!     encrypted_value text        NOT NULL,
//!     last_used_at    timestamptz NOT NULL DEFAULT to_timestamp(0),
//!     PRIMARY KEY (account_id, key_index)
//! );
//! ```

use crate::errors::{Result, SealSignError};
use crate::lease::{KeyRecord, LeaseStore};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use std::time::Duration;
use tracing::debug;

const LEASE_KEY_SQL: &str = "
UPDATE account_keys
SET last_used_at = now()
WHERE account_id = $1
  AND key_index = (
    SELECT key_index
    FROM account_keys
    WHERE account_id = $1
    ORDER BY last_used_at, key_index
    LIMIT 1
    FOR UPDATE SKIP LOCKED
  )
RETURNING key_index
";

const POOL_EXISTS_SQL: &str = "
SELECT EXISTS (SELECT 1 FROM account_keys WHERE account_id = $1)
";

const GET_KEY_SQL: &str = "
SELECT account_id, key_index, encrypted_value, last_used_at
FROM account_keys
WHERE account_id = $1 AND key_index = $2
";

/// Pause before re-attempting a lease when the whole pool is locked
const CONTENTION_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Lease store backed by a shared Postgres database
pub struct PgLeaseStore {
    pool: PgPool,
}

impl PgLeaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaseStore for PgLeaseStore {
    async fn lease_key(&self, account_id: &str) -> Result<u32> {
        loop {
            let leased: Option<i32> = sqlx::query_scalar(LEASE_KEY_SQL)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(key_index) = leased {
                debug!(account_id, key_index, "Leased signing key");
                return Ok(key_index as u32);
            }

            // No row returned: either the account has no keys at all, or all
            // of them are locked by in-flight leases right now.
            let has_keys: bool = sqlx::query_scalar(POOL_EXISTS_SQL)
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

            if !has_keys {
                return Err(SealSignError::LeaseExhausted {
                    account: account_id.to_string(),
                });
            }

            debug!(account_id, "Key pool contended, retrying lease");
            tokio::time::sleep(CONTENTION_RETRY_INTERVAL).await;
        }
    }

    async fn get_key(&self, account_id: &str, key_index: u32) -> Result<KeyRecord> {
        let row = sqlx::query(GET_KEY_SQL)
            .bind(account_id)
            .bind(key_index as i32)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                SealSignError::Storage(format!(
                    "No key record for account {} index {}",
                    account_id, key_index
                ))
            })?;

        Ok(KeyRecord {
            account_id: row.try_get("account_id")?,
            key_index: row.try_get::<i32, _>("key_index")? as u32,
            encrypted_value: row.try_get("encrypted_value")?,
            last_used_at: row.try_get("last_used_at")?,
        })
    }
}
