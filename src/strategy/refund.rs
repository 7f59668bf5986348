//! Refund Driver
//!
//! Sweeps every trading wallet's full SOL balance to the collection wallet,
//! nine wallets per transaction. The funder wallet pays the fee so each
//! trading wallet can be drained to zero. Refunds go direct to the RPC; there
//! is nothing to protect from reordering here.

use std::time::Duration;

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::system_instruction;
use solana_sdk::transaction::VersionedTransaction;
use tracing::{info, warn};

use super::{StrategyError, TradeContext};
use crate::adapters::solana::tx_builder;
use crate::domain::wallet::Wallet;

/// Wallets swept per transaction.
pub const WALLETS_PER_TX: usize = 9;

const CONFIRM_TIMEOUT: Duration = Duration::from_secs(29);

#[derive(Debug, Clone)]
pub struct RefundParams {
    /// Where the swept SOL goes.
    pub destination: Pubkey,
}

pub async fn run(ctx: &TradeContext, params: &RefundParams) -> Result<(), StrategyError> {
    let sender = ctx.config.sender()?;
    let mut swept_total = 0u64;

    for chunk in ctx.wallets.chunks(WALLETS_PER_TX) {
        let mut funded: Vec<(&Wallet, u64)> = Vec::new();
        for wallet in chunk {
            let balance = ctx.rpc.get_balance(&wallet.pubkey()).await?;
            if balance == 0 {
                continue;
            }
            funded.push((wallet, balance));
        }
        if funded.is_empty() {
            continue;
        }

        let blockhash = ctx.rpc.latest_blockhash().await?;
        let tx = sweep_transaction(&sender, &params.destination, &funded, blockhash)?;
        let signature = ctx.rpc.send_transaction(&tx, 0).await?;

        let chunk_total: u64 = funded.iter().map(|(_, lamports)| lamports).sum();
        if ctx.rpc.confirm_signature(&signature, CONFIRM_TIMEOUT).await? {
            swept_total += chunk_total;
            info!(%signature, wallets = funded.len(), lamports = chunk_total, "refund confirmed");
        } else {
            warn!(%signature, "refund not confirmed in time");
        }
    }

    info!(swept_sol = swept_total as f64 / 1e9, "refund complete");
    Ok(())
}

/// One sweep transaction: a full-balance transfer per wallet, fee paid by the
/// funder so the wallets empty out completely. Every swept wallet co-signs.
fn sweep_transaction(
    sender: &Keypair,
    destination: &Pubkey,
    wallets: &[(&Wallet, u64)],
    blockhash: Hash,
) -> Result<VersionedTransaction, StrategyError> {
    let instructions: Vec<Instruction> = wallets
        .iter()
        .map(|(wallet, lamports)| {
            system_instruction::transfer(&wallet.pubkey(), destination, *lamports)
        })
        .collect();
    let signers: Vec<&Keypair> = wallets.iter().map(|(wallet, _)| wallet.keypair()).collect();
    Ok(tx_builder::build_transaction(
        sender,
        &instructions,
        &signers,
        blockhash,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::message::VersionedMessage;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_sweep_drains_full_balances_to_destination() {
        let sender = Keypair::new();
        let destination = Pubkey::new_unique();
        let wallets: Vec<Wallet> = (0..3).map(|_| Wallet::generate()).collect();
        let funded: Vec<(&Wallet, u64)> = wallets
            .iter()
            .zip([1_000_000u64, 250_000, 42])
            .collect();

        let tx = sweep_transaction(&sender, &destination, &funded, Hash::default()).unwrap();

        // Sender pays the fee plus one signature per swept wallet.
        assert_eq!(tx.signatures.len(), 4);
        assert!(tx.verify_with_results().iter().all(|ok| *ok));

        let VersionedMessage::V0(message) = &tx.message else {
            panic!("expected v0 message");
        };
        assert_eq!(message.account_keys[0], sender.pubkey());
        assert_eq!(message.instructions.len(), 3);
        for (ix, (wallet, lamports)) in message.instructions.iter().zip(&funded) {
            let amount = u64::from_le_bytes(ix.data[4..12].try_into().unwrap());
            assert_eq!(amount, *lamports);
            let from = message.account_keys[ix.accounts[0] as usize];
            let to = message.account_keys[ix.accounts[1] as usize];
            assert_eq!(from, wallet.pubkey());
            assert_eq!(to, destination);
        }
    }

    #[test]
    fn test_twenty_wallets_sweep_in_three_transactions() {
        let wallets: Vec<Wallet> = (0..20).map(|_| Wallet::generate()).collect();
        let sizes: Vec<usize> = wallets.chunks(WALLETS_PER_TX).map(|c| c.len()).collect();
        assert_eq!(sizes, [9, 9, 2]);
    }
}
