//! Staggered Buy Driver
//!
//! A fixed number of loops over the whole wallet set, one buy per wallet per
//! loop with a pause in between. Spreads volume over time instead of landing
//! it in one block.

use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use super::common;
use super::{StrategyError, TokenSession, TradeContext};
use crate::adapters::solana::RpcError;
use crate::domain::sizing::SizedBuy;

#[derive(Debug, Clone)]
pub struct StaggerParams {
    pub mint: solana_sdk::pubkey::Pubkey,
    /// Passes over the wallet set.
    pub loops: u64,
    /// Pause between wallets.
    pub delay: Duration,
}

/// Returns total SOL volume bought across all loops.
pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &StaggerParams,
    rng: &mut R,
) -> Result<f64, StrategyError> {
    let mut session = TokenSession::open(&ctx.rpc, params.mint).await?;
    let plans = common::plan_buys(ctx, rng);
    let mut total_volume_sol = 0.0;

    for pass in 1..=params.loops {
        info!(pass, loops = params.loops, "starting pass");

        for plan in &plans {
            let lamports = match common::sized_buy_for(ctx, plan.wallet, plan.amount_sol).await? {
                SizedBuy::Skip => {
                    warn!(wallet = %plan.wallet.pubkey(), "balance too low, skipping");
                    continue;
                }
                SizedBuy::Downsized(v) | SizedBuy::Full(v) => v,
            };

            let ixs =
                common::buy_instructions(ctx, &mut session, plan.wallet, lamports, ctx.config.slippage);
            let blockhash = ctx.rpc.latest_blockhash().await?;
            let swap = common::sign_swap(plan.wallet, &ixs, blockhash)?;

            // One bad wallet shouldn't sink the pass.
            if let Err(RpcError::SimulationFailed(reason)) = ctx.rpc.simulate(&swap).await {
                warn!(wallet = %plan.wallet.pubkey(), %reason, "simulation failed, skipping");
                continue;
            }

            if ctx.config.use_jito {
                let outcome = common::submit_single_swap_bundle(ctx, swap, blockhash, rng).await?;
                info!(wallet = %plan.wallet.pubkey(), lamports, ?outcome, "buy bundle resolved");
            } else {
                let signature = ctx.rpc.send_transaction(&swap, 0).await?;
                info!(wallet = %plan.wallet.pubkey(), lamports, %signature, "buy sent direct");
            }

            total_volume_sol += lamports as f64 / 1e9;
            tokio::time::sleep(params.delay).await;
        }
    }

    info!(total_volume_sol, "staggered buy complete");
    Ok(total_volume_sol)
}
