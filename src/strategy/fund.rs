//! Funding Driver
//!
//! Distributes SOL from the funder wallet to every trading wallet, ten
//! transfers per transaction and four transactions per bundle. Amounts come
//! from the per-wallet override file or a uniform draw from [minBuy, maxBuy].

use rand::Rng;
use solana_sdk::system_instruction;
use solana_sdk::transaction::VersionedTransaction;
use tracing::info;

use super::{StrategyError, TradeContext};
use crate::adapters::jito::{assemble_bundle, build_tip_transaction, MAX_SWAPS_PER_BUNDLE};
use crate::adapters::solana::tx_builder;
use crate::domain::sizing::sol_to_lamports;

/// Recipients per transfer transaction.
pub const WALLETS_PER_TX: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct FundParams {
    /// Extra headroom added to every funded amount, in SOL (covers fees and
    /// the rent-exempt minimum for the ATA).
    pub headroom_sol: f64,
}

pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &FundParams,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let sender = ctx.config.sender()?;
    let tip_payer = ctx.config.tip_payer()?;

    // Per-wallet amounts, override file first.
    let amounts: Vec<u64> = (0..ctx.wallets.len())
        .map(|idx| {
            let sol = ctx.overrides.amount_for(idx).unwrap_or_else(|| {
                rng.gen_range(ctx.config.min_buy..=ctx.config.max_buy)
            });
            sol_to_lamports(sol + params.headroom_sol)
        })
        .collect();
    let total: u64 = amounts.iter().sum();
    info!(
        wallets = ctx.wallets.len(),
        total_sol = total as f64 / 1e9,
        "funding wallets"
    );

    let recipients: Vec<_> = ctx.wallets.iter().map(|w| w.pubkey()).collect();
    let groups: Vec<_> = recipients
        .chunks(WALLETS_PER_TX)
        .zip(amounts.chunks(WALLETS_PER_TX))
        .collect();

    for bundle_group in groups.chunks(MAX_SWAPS_PER_BUNDLE) {
        let mut transfers: Vec<VersionedTransaction> = Vec::new();
        let blockhash = ctx.rpc.latest_blockhash().await?;

        for (wallet_chunk, amount_chunk) in bundle_group {
            let instructions: Vec<_> = wallet_chunk
                .iter()
                .zip(amount_chunk.iter())
                .map(|(to, lamports)| {
                    system_instruction::transfer(
                        &solana_sdk::signer::Signer::pubkey(&sender),
                        to,
                        *lamports,
                    )
                })
                .collect();
            transfers.push(tx_builder::build_transaction(
                &sender,
                &instructions,
                &[],
                blockhash,
            )?);
        }

        let tip = build_tip_transaction(&tip_payer, ctx.config.tip_lamports(), blockhash, rng)?;
        let bundle = assemble_bundle(transfers, tip)?;
        let outcome = ctx.jito.submit_and_confirm(&bundle).await?;
        info!(?outcome, "funding bundle resolved");
    }

    Ok(())
}
