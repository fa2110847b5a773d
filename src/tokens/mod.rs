//! Fungible-token transfers
//!
//! Builds transfer transaction intents from the bundled Cadence templates.
//! The signing account acts as proposer, payer and authorizer.

pub mod templates;

use crate::config::Contracts;
use crate::ledger::{Argument, Authorization, TransactionIntent};

/// Build a FLOW transfer intent
pub fn transfer_flow(
    recipient: &str,
    amount: &str,
    authorization: Authorization,
    contracts: &Contracts,
) -> TransactionIntent {
    transfer(templates::transfer_flow(contracts), recipient, amount, authorization)
}

/// Build a FUSD transfer intent
pub fn transfer_fusd(
    recipient: &str,
    amount: &str,
    authorization: Authorization,
    contracts: &Contracts,
) -> TransactionIntent {
    transfer(templates::transfer_fusd(contracts), recipient, amount, authorization)
}

fn transfer(
    code: String,
    recipient: &str,
    amount: &str,
    authorization: Authorization,
) -> TransactionIntent {
    TransactionIntent::self_paid(
        code,
        vec![Argument::address(recipient), Argument::ufix64(amount)],
        authorization,
    )
}
