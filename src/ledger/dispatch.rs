//! Transaction dispatch
//!
//! Submits a transaction intent to the ledger and blocks until the network
//! reports it sealed. The two failure channels stay distinct end to end:
//! a rejected submission is a `Dispatch` error (retryable with a fresh
//! lease), while a sealed transaction whose body failed on-chain is an
//! `Execution` error (terminal for that transaction id).

use crate::errors::{Result, SealSignError};
use crate::ledger::{LedgerClient, TransactionIntent, TransactionResult};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Computation limit attached to every transaction
pub const DEFAULT_GAS_LIMIT: u64 = 1000;

/// Upper bound on the seal wait; the network defines no bound of its own
pub const DEFAULT_SEAL_TIMEOUT: Duration = Duration::from_secs(300);

/// Submits transactions and waits for finality
pub struct Dispatcher<C> {
    client: C,
    seal_timeout: Duration,
}

impl<C: LedgerClient> Dispatcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            seal_timeout: DEFAULT_SEAL_TIMEOUT,
        }
    }

    pub fn with_seal_timeout(client: C, seal_timeout: Duration) -> Self {
        Self {
            client,
            seal_timeout,
        }
    }

    /// Submit an intent and wait for the sealed result
    ///
    /// Once `submit` returns an id the transaction cannot be recalled;
    /// abandoning the seal wait does not stop on-chain execution.
    pub async fn dispatch(&self, intent: &TransactionIntent) -> Result<TransactionResult> {
        let id = self.client.submit(intent).await?;

        info!(tx_id = %id, proposer = %intent.proposer.address(), "Transaction submitted");

        let sealed = timeout(self.seal_timeout, self.client.wait_for_seal(&id))
            .await
            .map_err(|_| {
                warn!(tx_id = %id, "Seal wait timed out; transaction may still execute");
                SealSignError::SealTimeout { id: id.clone() }
            })??;

        if let Some(message) = sealed.error {
            warn!(tx_id = %id, error = %message, "Transaction sealed with execution error");
            return Err(SealSignError::Execution { id, message });
        }

        info!(tx_id = %id, events = sealed.events.len(), "Transaction sealed");
        Ok(TransactionResult {
            id,
            events: sealed.events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{HashAlgorithm, SignatureAlgorithm};
    use crate::keys::{KeyManager, Signer};
    use crate::ledger::{Argument, Authorization, Event, SealedResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    enum Behavior {
        RejectSubmission,
        SealClean,
        SealWithError,
        NeverSeal,
    }

    struct FakeLedger {
        behavior: Behavior,
    }

    #[async_trait]
    impl LedgerClient for FakeLedger {
        async fn submit(&self, intent: &TransactionIntent) -> Result<String> {
            if let Behavior::RejectSubmission = self.behavior {
                return Err(SealSignError::Dispatch("signature rejected".to_string()));
            }

            // A real client signs the canonical payload and envelope with the
            // intent's authorizations before submitting
            let envelope = intent.payer.sign(b"envelope").unwrap();
            assert_eq!(envelope.signature_hex().len(), 128);

            Ok("tx-1".to_string())
        }

        async fn wait_for_seal(&self, id: &str) -> Result<SealedResult> {
            match self.behavior {
                Behavior::SealClean => Ok(SealedResult {
                    error: None,
                    events: vec![Event {
                        ty: "TokensWithdrawn".to_string(),
                        data: json!({"amount": "10.0"}),
                    }],
                }),
                Behavior::SealWithError => Ok(SealedResult {
                    error: Some(format!("[Error Code: 1101] panic in {}", id)),
                    events: vec![],
                }),
                Behavior::NeverSeal => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("seal wait should have been cut off")
                }
                Behavior::RejectSubmission => unreachable!(),
            }
        }
    }

    fn test_intent() -> TransactionIntent {
        let manager = KeyManager::new(SignatureAlgorithm::EcdsaP256, HashAlgorithm::Sha3_256);
        let key = Arc::new(manager.generate());
        let auth = Authorization::new("0x01", 0, Signer::new(key));
        TransactionIntent::self_paid(
            "transaction { execute {} }",
            vec![Argument::ufix64("10.0")],
            auth,
        )
    }

    #[tokio::test]
    async fn test_clean_seal_returns_result() {
        let dispatcher = Dispatcher::new(FakeLedger {
            behavior: Behavior::SealClean,
        });

        let result = dispatcher.dispatch(&test_intent()).await.unwrap();
        assert_eq!(result.id, "tx-1");
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].ty, "TokensWithdrawn");
    }

    #[tokio::test]
    async fn test_rejected_submission_is_dispatch_error() {
        let dispatcher = Dispatcher::new(FakeLedger {
            behavior: Behavior::RejectSubmission,
        });

        let result = dispatcher.dispatch(&test_intent()).await;
        assert!(matches!(result, Err(SealSignError::Dispatch(_))));
    }

    #[tokio::test]
    async fn test_sealed_failure_is_execution_error() {
        // Accepted then failed on-chain: must not look like a dispatch error
        let dispatcher = Dispatcher::new(FakeLedger {
            behavior: Behavior::SealWithError,
        });

        let result = dispatcher.dispatch(&test_intent()).await;
        match result {
            Err(SealSignError::Execution { id, message }) => {
                assert_eq!(id, "tx-1");
                assert!(message.contains("Error Code: 1101"));
            }
            other => panic!("expected execution error, got {:?}", other.map(|r| r.id)),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_seal_wait_is_bounded() {
        let dispatcher = Dispatcher::with_seal_timeout(
            FakeLedger {
                behavior: Behavior::NeverSeal,
            },
            Duration::from_secs(300),
        );

        let result = dispatcher.dispatch(&test_intent()).await;
        match result {
            Err(SealSignError::SealTimeout { id }) => assert_eq!(id, "tx-1"),
            other => panic!("expected seal timeout, got {:?}", other.map(|r| r.id)),
        }
    }
}
