//! Sell-Off Driver
//!
//! Walks every wallet and sells a fraction (default all) of its token
//! balance, one tip-carrying bundle per wallet. Wallets without a token
//! account or with an empty balance are skipped.

use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use super::common;
use super::{StrategyError, TokenSession, TradeContext};

#[derive(Debug, Clone)]
pub struct SellOffParams {
    pub mint: solana_sdk::pubkey::Pubkey,
    /// Fraction of each wallet's balance to sell, in (0, 1].
    pub fraction: f64,
    /// Pause between wallets.
    pub delay: Duration,
}

pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &SellOffParams,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let session = TokenSession::open(&ctx.rpc, params.mint).await?;
    let fraction = params.fraction.clamp(0.0, 1.0);

    for (idx, wallet) in ctx.wallets.iter().enumerate() {
        info!(
            wallet = %wallet.pubkey(),
            progress = format!("{}/{}", idx + 1, ctx.wallets.len()),
            "processing wallet"
        );

        let Some((_, balance)) = common::token_balance(ctx, wallet, &session).await? else {
            warn!(wallet = %wallet.pubkey(), "no token account, skipping");
            continue;
        };
        let amount = (balance as f64 * fraction) as u64;
        if amount == 0 {
            warn!(wallet = %wallet.pubkey(), "empty token balance, skipping");
            continue;
        }

        let ixs = common::sell_instructions(ctx, &session, wallet, amount);
        let blockhash = ctx.rpc.latest_blockhash().await?;
        let swap = common::sign_swap(wallet, &ixs, blockhash)?;

        if ctx.config.use_jito {
            let outcome = common::submit_single_swap_bundle(ctx, swap, blockhash, rng).await?;
            info!(wallet = %wallet.pubkey(), amount, ?outcome, "sell bundle resolved");
        } else {
            let signature = ctx.rpc.send_transaction(&swap, 0).await?;
            info!(wallet = %wallet.pubkey(), amount, %signature, "sell sent direct");
        }

        tokio::time::sleep(params.delay).await;
    }

    Ok(())
}
