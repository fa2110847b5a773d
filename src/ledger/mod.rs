//! Ledger transaction types and the network client seam
//!
//! The core never talks to the network directly; it drives a `LedgerClient`
//! implementation supplied at construction. That keeps the dispatch logic
//! testable against fakes and leaves transport details (access API, codecs)
//! to the embedding service.

pub mod authorization;
pub mod dispatch;

pub use authorization::{AccountSignature, Authorization};
pub use dispatch::Dispatcher;

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A typed transaction argument in JSON-Cadence shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: Value,
}

impl Argument {
    pub fn address(address: &str) -> Self {
        Self {
            ty: "Address".to_string(),
            value: json!(with_prefix(address)),
        }
    }

    pub fn ufix64(amount: &str) -> Self {
        Self {
            ty: "UFix64".to_string(),
            value: json!(amount),
        }
    }

    pub fn string(value: &str) -> Self {
        Self {
            ty: "String".to_string(),
            value: json!(value),
        }
    }
}

/// Everything needed to submit one transaction
#[derive(Clone)]
pub struct TransactionIntent {
    /// Transaction script source
    pub code: String,
    pub arguments: Vec<Argument>,
    pub gas_limit: u64,
    pub proposer: Authorization,
    pub payer: Authorization,
    pub authorizers: Vec<Authorization>,
}

impl TransactionIntent {
    /// Intent with a single authorization acting as proposer, payer and
    /// authorizer, the common shape for custodial transfers
    pub fn self_paid(code: impl Into<String>, arguments: Vec<Argument>, auth: Authorization) -> Self {
        Self {
            code: code.into(),
            arguments,
            gas_limit: dispatch::DEFAULT_GAS_LIMIT,
            proposer: auth.clone(),
            payer: auth.clone(),
            authorizers: vec![auth],
        }
    }
}

/// An event emitted by a sealed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub ty: String,
    pub data: Value,
}

/// Terminal state reported by the network for a submitted transaction
#[derive(Debug, Clone)]
pub struct SealedResult {
    /// On-chain execution error, if the transaction body failed
    pub error: Option<String>,
    pub events: Vec<Event>,
}

/// Outcome of a successfully dispatched and cleanly sealed transaction
#[derive(Debug, Clone)]
pub struct TransactionResult {
    pub id: String,
    pub events: Vec<Event>,
}

/// Client for the ledger network's submission and status endpoints
///
/// `submit` failures must surface as `SealSignError::Dispatch`: the
/// transaction was never accepted and the caller may retry with a fresh
/// lease. Errors reported inside a sealed transaction travel through
/// `SealedResult::error` instead.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a transaction, returning its id once accepted
    async fn submit(&self, intent: &TransactionIntent) -> Result<String>;

    /// Block until the transaction reaches a sealed state
    async fn wait_for_seal(&self, id: &str) -> Result<SealedResult>;
}

/// Normalize an address to its 0x-prefixed form
pub fn with_prefix(address: &str) -> String {
    format!("0x{}", sans_prefix(address))
}

/// Strip a 0x prefix if present
pub fn sans_prefix(address: &str) -> &str {
    address.strip_prefix("0x").unwrap_or(address)
}
