//! Error types for sealsign

use thiserror::Error;

/// Main error type for sealsign operations
#[derive(Error, Debug)]
pub enum SealSignError {
    // Cryptographic errors
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    // Lease errors
    #[error("No signing keys configured for account {account}")]
    LeaseExhausted { account: String },

    // Transaction errors
    //
    // `Dispatch` is a submission rejected before the ledger accepted the
    // transaction; the caller may retry with a fresh lease. `Execution` is a
    // sealed transaction whose body failed on-chain; terminal for that id.
    #[error("Transaction submission failed: {0}")]
    Dispatch(String),

    #[error("Execution failed for {id}: {message}")]
    Execution { id: String, message: String },

    #[error("Transaction {id} was not sealed within the configured timeout")]
    SealTimeout { id: String },

    // Job polling errors
    #[error("Job {job_id} still pending after {attempts} polls")]
    PollTimeout { job_id: String, attempts: u32 },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<hex::FromHexError> for SealSignError {
    fn from(err: hex::FromHexError) -> Self {
        SealSignError::InvalidKeyFormat(format!("Hex decode error: {}", err))
    }
}

impl From<sqlx::Error> for SealSignError {
    fn from(err: sqlx::Error) -> Self {
        SealSignError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SealSignError>;
