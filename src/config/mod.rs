//! Configuration management for sealsign
//!
//! Supports loading configuration from:
//! - Environment variables (SEALSIGN_*)
//! - Config file (config.toml)

use crate::crypto::{HashAlgorithm, SignatureAlgorithm};
use crate::errors::{Result, SealSignError};
use crate::keys::KeyManager;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ledger network configuration
    pub ledger: LedgerConfig,

    /// Key pool configuration
    pub keys: KeysConfig,

    /// Backing store configuration
    pub database: DatabaseConfig,
}

/// Ledger network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Access API endpoint
    pub access_api_host: String,

    /// Chain name ("emulator" or "testnet"), selects contract addresses
    pub chain: String,

    /// Maximum time to wait for a transaction to seal, in seconds
    pub seal_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            access_api_host: "http://localhost:8080".to_string(),
            chain: "emulator".to_string(),
            seal_timeout_secs: 300,
        }
    }
}

/// Key pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Signature algorithm (ECDSA_P256 or ECDSA_secp256k1)
    pub sig_algo: String,

    /// Hash algorithm (SHA2_256 or SHA3_256)
    pub hash_algo: String,

    /// Hex-encoded 32-byte key for encrypting key material at rest;
    /// when unset, keys are stored as plain hex
    pub encryption_key: Option<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            sig_algo: "ECDSA_P256".to_string(),
            hash_algo: "SHA3_256".to_string(),
            encryption_key: None,
        }
    }
}

/// Backing store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/sealsign".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Start with defaults
        builder = builder.add_source(config::Config::try_from(&Config::default()).unwrap());

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        } else {
            builder = builder.add_source(config::File::with_name("config").required(false));
        }

        // Load from environment (SEALSIGN_LEDGER__CHAIN, etc.)
        builder = builder.add_source(
            config::Environment::with_prefix("SEALSIGN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SealSignError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| SealSignError::Config(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.sig_algo()?;
        self.hash_algo()?;
        self.encryption_key()?;
        Contracts::for_chain(&self.ledger.chain)?;
        Ok(())
    }

    pub fn sig_algo(&self) -> Result<SignatureAlgorithm> {
        self.keys.sig_algo.parse()
    }

    pub fn hash_algo(&self) -> Result<HashAlgorithm> {
        self.keys.hash_algo.parse()
    }

    /// Decode the configured encryption key, if any
    pub fn encryption_key(&self) -> Result<Option<[u8; 32]>> {
        let Some(hex_value) = &self.keys.encryption_key else {
            return Ok(None);
        };

        let bytes = hex::decode(hex_value)
            .map_err(|e| SealSignError::Config(format!("Invalid encryption key: {}", e)))?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| {
            SealSignError::Config("Encryption key must be exactly 32 bytes".to_string())
        })?;

        Ok(Some(key))
    }

    /// Build the key manager described by this configuration
    pub fn key_manager(&self) -> Result<KeyManager> {
        let sig_algo = self.sig_algo()?;
        let hash_algo = self.hash_algo()?;

        Ok(match self.encryption_key()? {
            Some(key) => KeyManager::with_encryption_key(sig_algo, hash_algo, key),
            None => KeyManager::new(sig_algo, hash_algo),
        })
    }

    pub fn seal_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger.seal_timeout_secs)
    }

    pub fn contracts(&self) -> Result<Contracts> {
        Contracts::for_chain(&self.ledger.chain)
    }
}

/// Well-known contract addresses for a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contracts {
    pub flow_token: &'static str,
    pub fungible_token: &'static str,
    pub fusd: &'static str,
}

impl Contracts {
    pub fn for_chain(chain: &str) -> Result<Self> {
        match chain {
            "emulator" => Ok(Self {
                flow_token: "0x0ae53cb6e3f42a79",
                fungible_token: "0xee82856bf20e2aa6",
                fusd: "0xf8d6e0586b0a20c7",
            }),
            "testnet" => Ok(Self {
                flow_token: "0x7e60df042a9c0868",
                fungible_token: "0x9a0766d93b6608b7",
                fusd: "0xe223d8a629e49c68",
            }),
            _ => Err(SealSignError::Config(format!("Invalid chain: {}", chain))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.sig_algo().unwrap(), SignatureAlgorithm::EcdsaP256);
        assert_eq!(config.hash_algo().unwrap(), HashAlgorithm::Sha3_256);
        assert!(config.encryption_key().unwrap().is_none());
    }

    #[test]
    fn test_unknown_algorithm_fails_validation() {
        let mut config = Config::default();
        config.keys.sig_algo = "ECDSA_P384".to_string();
        assert!(matches!(
            config.validate(),
            Err(SealSignError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_encryption_key_must_be_32_bytes() {
        let mut config = Config::default();
        config.keys.encryption_key = Some("aabb".to_string());
        assert!(matches!(
            config.validate(),
            Err(SealSignError::Config(_))
        ));

        config.keys.encryption_key = Some(hex::encode([0u8; 32]));
        config.validate().unwrap();
        assert_eq!(config.encryption_key().unwrap(), Some([0u8; 32]));
    }

    #[test]
    fn test_contracts_per_chain() {
        let emulator = Contracts::for_chain("emulator").unwrap();
        assert_eq!(emulator.fusd, "0xf8d6e0586b0a20c7");

        let testnet = Contracts::for_chain("testnet").unwrap();
        assert_eq!(testnet.flow_token, "0x7e60df042a9c0868");

        assert!(Contracts::for_chain("mainnet").is_err());
    }
}
