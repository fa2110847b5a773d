//! Account creation
//!
//! Builds and dispatches the transaction that creates a new custodial
//! account: the new public key is registered at full signing weight and the
//! account is provisioned with an FUSD vault so it can receive tokens
//! immediately. The created address is read back from the network's
//! account-creation event on the sealed result.

use crate::config::Contracts;
use crate::crypto::{HashAlgorithm, PublicKey, SignatureAlgorithm};
use crate::errors::{Result, SealSignError};
use crate::ledger::{
    with_prefix, Argument, Authorization, Dispatcher, LedgerClient, TransactionIntent,
};
use tracing::info;

/// Full signing weight for the account's first key
pub const ACCOUNT_KEY_WEIGHT: u32 = 1000;

/// Event emitted by the network when a transaction creates an account
const ACCOUNT_CREATED_EVENT: &str = "flow.AccountCreated";

/// Encode a public key for on-chain registration
///
/// The ledger expects an RLP list of the raw X‖Y key, the signature and hash
/// algorithm identifiers and the key weight, hex-encoded.
pub fn encode_account_key(
    public_key: &PublicKey,
    sig_algo: SignatureAlgorithm,
    hash_algo: HashAlgorithm,
    weight: u32,
) -> String {
    let mut stream = rlp::RlpStream::new_list(4);
    stream.append(&public_key.to_bytes().to_vec());
    stream.append(&sig_algo_code(sig_algo));
    stream.append(&hash_algo_code(hash_algo));
    stream.append(&weight);
    hex::encode(stream.out())
}

fn sig_algo_code(sig_algo: SignatureAlgorithm) -> u8 {
    match sig_algo {
        SignatureAlgorithm::EcdsaP256 => 2,
        SignatureAlgorithm::EcdsaSecp256k1 => 3,
    }
}

fn hash_algo_code(hash_algo: HashAlgorithm) -> u8 {
    match hash_algo {
        HashAlgorithm::Sha2_256 => 1,
        HashAlgorithm::Sha3_256 => 3,
    }
}

/// Build the create-account intent for a new public key
pub fn create_account_intent(
    public_key: &PublicKey,
    sig_algo: SignatureAlgorithm,
    hash_algo: HashAlgorithm,
    authorization: Authorization,
    contracts: &Contracts,
) -> TransactionIntent {
    let encoded_key = encode_account_key(public_key, sig_algo, hash_algo, ACCOUNT_KEY_WEIGHT);
    TransactionIntent::self_paid(
        create_account_template(contracts),
        vec![Argument::string(&encoded_key)],
        authorization,
    )
}

/// Create a new account holding the given public key
///
/// Returns the new account's 0x-prefixed address, read from the creation
/// event of the sealed result. A sealed transaction without that event is
/// reported as an execution failure for its transaction id.
pub async fn create_account<C: LedgerClient>(
    dispatcher: &Dispatcher<C>,
    public_key: &PublicKey,
    sig_algo: SignatureAlgorithm,
    hash_algo: HashAlgorithm,
    authorization: Authorization,
    contracts: &Contracts,
) -> Result<String> {
    let intent = create_account_intent(public_key, sig_algo, hash_algo, authorization, contracts);
    let result = dispatcher.dispatch(&intent).await?;

    let address = result
        .events
        .iter()
        .find(|event| event.ty == ACCOUNT_CREATED_EVENT)
        .and_then(|event| event.data.get("address"))
        .and_then(|address| address.as_str())
        .ok_or_else(|| SealSignError::Execution {
            id: result.id.clone(),
            message: format!("Sealed without an {} event", ACCOUNT_CREATED_EVENT),
        })?;

    info!(tx_id = %result.id, address = %address, "Account created");
    Ok(with_prefix(address))
}

fn create_account_template(contracts: &Contracts) -> String {
    format!(
        r#"import FungibleToken from {fungible_token}
import FUSD from {fusd}

transaction(publicKey: String) {{

  let account: AuthAccount

  prepare(signer: AuthAccount) {{
    self.account = AuthAccount(payer: signer)
  }}

  execute {{
    self.account.addPublicKey(publicKey.decodeHex())

    self.account.save(<-FUSD.createEmptyVault(), to: /storage/fusdVault)

    self.account.link<&FUSD.Vault{{FungibleToken.Receiver}}>(
        /public/fusdReceiver,
        target: /storage/fusdVault
    )

    self.account.link<&FUSD.Vault{{FungibleToken.Balance}}>(
        /public/fusdBalance,
        target: /storage/fusdVault
    )
  }}
}}
"#,
        fungible_token = contracts.fungible_token,
        fusd = contracts.fusd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::keys::{KeyManager, Signer};
    use crate::ledger::{Event, SealedResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct FakeLedger {
        created_address: Option<&'static str>,
    }

    #[async_trait]
    impl LedgerClient for FakeLedger {
        async fn submit(&self, intent: &TransactionIntent) -> Result<String> {
            // One String argument carrying the encoded key
            assert_eq!(intent.arguments.len(), 1);
            assert_eq!(intent.arguments[0].ty, "String");
            Ok("tx-7".to_string())
        }

        async fn wait_for_seal(&self, _id: &str) -> Result<SealedResult> {
            let events = match self.created_address {
                Some(address) => vec![
                    Event {
                        ty: ACCOUNT_CREATED_EVENT.to_string(),
                        data: json!({"address": address}),
                    },
                    Event {
                        ty: "flow.AccountKeyAdded".to_string(),
                        data: json!({}),
                    },
                ],
                None => vec![],
            };
            Ok(SealedResult {
                error: None,
                events,
            })
        }
    }

    fn test_authorization() -> Authorization {
        let manager = KeyManager::new(SignatureAlgorithm::EcdsaP256, HashAlgorithm::Sha3_256);
        Authorization::new("0xf8d6e0586b0a20c7", 0, Signer::new(Arc::new(manager.generate())))
    }

    #[test]
    fn test_encode_account_key_layout() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256);
        let encoded = encode_account_key(
            &key.public_key(),
            SignatureAlgorithm::EcdsaP256,
            HashAlgorithm::Sha3_256,
            ACCOUNT_KEY_WEIGHT,
        );

        // List of 71 payload bytes: 2-byte string header + 64-byte key,
        // one byte per algorithm code, 3 bytes for the weight
        assert_eq!(encoded.len(), 146);
        let expected_prefix = format!("f847b840{}", key.public_key().to_hex());
        assert!(encoded.starts_with(&expected_prefix));
        // P-256 is 2, SHA3-256 is 3, weight 1000 is 0x03e8
        assert!(encoded.ends_with("02038203e8"));
    }

    #[test]
    fn test_encode_account_key_algorithm_codes() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaSecp256k1);
        let encoded = encode_account_key(
            &key.public_key(),
            SignatureAlgorithm::EcdsaSecp256k1,
            HashAlgorithm::Sha2_256,
            ACCOUNT_KEY_WEIGHT,
        );

        // secp256k1 is 3, SHA2-256 is 1
        assert!(encoded.ends_with("03018203e8"));
    }

    #[test]
    fn test_intent_imports_chain_contracts() {
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256);
        let contracts = Contracts::for_chain("testnet").unwrap();
        let intent = create_account_intent(
            &key.public_key(),
            SignatureAlgorithm::EcdsaP256,
            HashAlgorithm::Sha3_256,
            test_authorization(),
            &contracts,
        );

        assert!(intent.code.contains("import FUSD from 0xe223d8a629e49c68"));
        assert!(intent.code.contains("/storage/fusdVault"));
        assert_eq!(intent.proposer.address(), intent.payer.address());
    }

    #[tokio::test]
    async fn test_create_account_returns_created_address() {
        let dispatcher = Dispatcher::new(FakeLedger {
            created_address: Some("01cf0e2f2f715450"),
        });
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256);
        let contracts = Contracts::for_chain("emulator").unwrap();

        let address = create_account(
            &dispatcher,
            &key.public_key(),
            SignatureAlgorithm::EcdsaP256,
            HashAlgorithm::Sha3_256,
            test_authorization(),
            &contracts,
        )
        .await
        .unwrap();

        assert_eq!(address, "0x01cf0e2f2f715450");
    }

    #[tokio::test]
    async fn test_create_account_fails_without_creation_event() {
        let dispatcher = Dispatcher::new(FakeLedger {
            created_address: None,
        });
        let key = PrivateKey::generate(SignatureAlgorithm::EcdsaP256);
        let contracts = Contracts::for_chain("emulator").unwrap();

        let result = create_account(
            &dispatcher,
            &key.public_key(),
            SignatureAlgorithm::EcdsaP256,
            HashAlgorithm::Sha3_256,
            test_authorization(),
            &contracts,
        )
        .await;

        match result {
            Err(SealSignError::Execution { id, .. }) => assert_eq!(id, "tx-7"),
            other => panic!("expected execution error, got {:?}", other.err()),
        }
    }
}
