//! sealsign - Custodial signing core for a Flow-style ledger
//!
//! Holds private key material on behalf of ledger accounts, leases signing
//! keys safely across concurrent requests, and dispatches signed transactions
//! to the network, waiting for finality.
//!
//! # Architecture
//!
//! - [`crypto`] - ECDSA keypairs, signing and hashing with fixed-width
//!   encodings
//! - [`keys`] - key (de)serialization, optionally AES-256-CTR encrypted at
//!   rest
//! - [`lease`] - atomic least-recently-used key selection per account; the
//!   piece that makes a scarce sequence-number slot safely shareable under
//!   arbitrary request concurrency
//! - [`ledger`] - authorizations, transaction dispatch and the network client
//!   seam
//! - [`jobs`] - bounded polling for APIs that return asynchronous job handles
//! - [`accounts`] - per-request composition (lease a key, load it, authorize)
//!   and on-ledger account creation
//! - [`tokens`] - fungible-token transfer transactions
//!
//! The HTTP surface, schema migrations and request validation live outside
//! this crate; they consume the types and traits defined here.
//!
//! # Example
//!
//! ```no_run
//! # async fn example(
//! #     client: impl sealsign::ledger::LedgerClient,
//! #     store: std::sync::Arc<sealsign::lease::MemoryLeaseStore>,
//! # ) -> sealsign::Result<()> {
//! use sealsign::accounts::{Account, AuthorizationProvider};
//! use sealsign::config::Config;
//! use sealsign::ledger::Dispatcher;
//! use sealsign::tokens;
//!
//! let config = Config::load(None)?;
//! config.validate()?;
//!
//! let provider = AuthorizationProvider::new(store, config.key_manager()?);
//! let account = Account {
//!     address: "0xf8d6e0586b0a20c7".to_string(),
//!     sig_algo: config.sig_algo()?,
//!     hash_algo: config.hash_algo()?,
//! };
//!
//! let authorization = provider.authorize(&account).await?;
//! let intent = tokens::transfer_flow(
//!     "0x01cf0e2f2f715450",
//!     "10.0",
//!     authorization,
//!     &config.contracts()?,
//! );
//!
//! let result = Dispatcher::new(client).dispatch(&intent).await?;
//! println!("sealed: {}", result.id);
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod jobs;
pub mod keys;
pub mod lease;
pub mod ledger;
pub mod tokens;

pub use errors::{Result, SealSignError};
