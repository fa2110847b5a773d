//! Cadence templates for token transfers, parameterized by the chain's
//! contract addresses

use crate::config::Contracts;

/// Transfer FLOW from the signer's vault to a recipient
pub fn transfer_flow(contracts: &Contracts) -> String {
    format!(
        r#"import FungibleToken from {fungible_token}
import FlowToken from {flow_token}

transaction(recipient: Address, amount: UFix64) {{

  let transferVault: @FungibleToken.Vault

  prepare(signer: AuthAccount) {{
    let vaultRef = signer
      .borrow<&FlowToken.Vault>(from: /storage/flowTokenVault)!

    self.transferVault <- vaultRef.withdraw(amount: amount)
  }}

  execute {{
    let receiverRef = getAccount(recipient)
      .getCapability(/public/flowTokenReceiver)
      .borrow<&{{FungibleToken.Receiver}}>()!

    receiverRef.deposit(from: <-self.transferVault)
  }}
}}
"#,
        fungible_token = contracts.fungible_token,
        flow_token = contracts.flow_token,
    )
}

/// Transfer FUSD from the signer's vault to a recipient
pub fn transfer_fusd(contracts: &Contracts) -> String {
    format!(
        r#"import FungibleToken from {fungible_token}
import FUSD from {fusd}

transaction(recipient: Address, amount: UFix64) {{

  let transferVault: @FungibleToken.Vault

  prepare(signer: AuthAccount) {{
    let vaultRef = signer
      .borrow<&FUSD.Vault>(from: /storage/fusdVault)!

    self.transferVault <- vaultRef.withdraw(amount: amount)
  }}

  execute {{
    let receiverRef = getAccount(recipient)
      .getCapability(/public/fusdReceiver)
      .borrow<&{{FungibleToken.Receiver}}>()!

    receiverRef.deposit(from: <-self.transferVault)
  }}
}}
"#,
        fungible_token = contracts.fungible_token,
        fusd = contracts.fusd,
    )
}
