//! Micro-Spam Driver
//!
//! Tight loop of minimal fixed-size buys, one per wallet, sent directly to
//! RPC with server-side retries. No bundling: the point is a steady drip of
//! small prints on the trade feed, not atomicity.

use std::time::Duration;

use tracing::{info, warn};

use super::common;
use super::{StrategyError, TokenSession, TradeContext};
use crate::domain::sizing::{size_buy, sol_to_lamports, SizedBuy};

/// Server-side resend attempts for each spam buy.
pub const SEND_MAX_RETRIES: usize = 5;
/// Slippage used for every micro buy, independent of config.
pub const MICRO_SLIPPAGE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct MicroParams {
    pub mint: solana_sdk::pubkey::Pubkey,
    /// Pause between sends.
    pub delay: Duration,
    /// Passes over the wallet set; `None` runs until interrupted.
    pub rounds: Option<u64>,
}

pub async fn run(ctx: &TradeContext, params: &MicroParams) -> Result<(), StrategyError> {
    let mut session = TokenSession::open(&ctx.rpc, params.mint).await?;
    let intended = sol_to_lamports(ctx.config.micro_buy_amount);

    let mut round = 0u64;
    loop {
        if let Some(limit) = params.rounds {
            if round >= limit {
                return Ok(());
            }
        }
        round += 1;

        for wallet in &ctx.wallets {
            let balance = ctx.rpc.get_balance(&wallet.pubkey()).await?;
            let lamports = match size_buy(balance, intended) {
                SizedBuy::Skip => {
                    warn!(wallet = %wallet.pubkey(), "balance too low, skipping");
                    continue;
                }
                SizedBuy::Downsized(v) | SizedBuy::Full(v) => v,
            };

            let ixs =
                common::buy_instructions(ctx, &mut session, wallet, lamports, MICRO_SLIPPAGE);
            let blockhash = ctx.rpc.latest_blockhash().await?;
            let swap = common::sign_swap(wallet, &ixs, blockhash)?;

            let signature = ctx.rpc.send_transaction(&swap, SEND_MAX_RETRIES).await?;
            info!(wallet = %wallet.pubkey(), lamports, %signature, "micro buy sent");

            tokio::time::sleep(params.delay).await;
        }
    }
}
