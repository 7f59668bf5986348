//! Warmup Driver
//!
//! Gives fresh wallets a trading history before the real run: each wallet
//! buys a small random amount of a random token from a supplied target list,
//! waits for confirmation, then sells the position back. Direct paced sends
//! only; warmup trades are not worth tip lamports.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use super::common;
use super::{StrategyError, TokenSession, TradeContext};
use crate::domain::sizing::{size_buy, sol_to_lamports, SizedBuy};

/// How long to wait for each warmup trade to confirm.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(29);

/// A candidate token for warmup trades.
#[derive(Debug, Clone)]
pub struct WarmupTarget {
    pub mint: Pubkey,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct WarmupParams {
    pub targets: Vec<WarmupTarget>,
    /// Pause between wallets.
    pub delay: Duration,
}

pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &WarmupParams,
    rng: &mut R,
) -> Result<(), StrategyError> {
    for wallet in &ctx.wallets {
        let Some(target) = params.targets.choose(rng) else {
            warn!("no warmup targets supplied");
            return Ok(());
        };

        let mut session = match TokenSession::open(&ctx.rpc, target.mint).await {
            Ok(s) => s,
            Err(e) => {
                warn!(mint = %target.mint, error = %e, "target unavailable, skipping wallet");
                continue;
            }
        };

        let amount_sol = {
            let raw = rng.gen_range(ctx.config.min_buy..=ctx.config.max_buy);
            (raw * 10_000.0).round() / 10_000.0
        };
        let balance = ctx.rpc.get_balance(&wallet.pubkey()).await?;
        let lamports = match size_buy(balance, sol_to_lamports(amount_sol)) {
            SizedBuy::Skip => {
                warn!(wallet = %wallet.pubkey(), "balance too low, skipping");
                continue;
            }
            SizedBuy::Downsized(v) | SizedBuy::Full(v) => v,
        };

        info!(
            wallet = %wallet.pubkey(),
            symbol = %target.symbol,
            lamports,
            "warmup buy"
        );
        if !round_trip(ctx, &mut session, wallet, lamports).await? {
            continue;
        }

        tokio::time::sleep(params.delay).await;
    }

    Ok(())
}

/// Buy, confirm, sell back, confirm. Returns false when either leg failed to
/// confirm in time; the wallet is left as-is for a later cleanup pass.
async fn round_trip(
    ctx: &TradeContext,
    session: &mut TokenSession,
    wallet: &crate::domain::wallet::Wallet,
    lamports: u64,
) -> Result<bool, StrategyError> {
    let ixs = common::buy_instructions(ctx, session, wallet, lamports, ctx.config.slippage);
    let blockhash = ctx.rpc.latest_blockhash().await?;
    let buy_tx = common::sign_swap(wallet, &ixs, blockhash)?;
    let signature = ctx.rpc.send_transaction(&buy_tx, 0).await?;

    if !ctx.rpc.confirm_signature(&signature, CONFIRM_TIMEOUT).await? {
        warn!(%signature, "warmup buy did not confirm, skipping sell");
        return Ok(false);
    }

    let Some((_, token_balance)) = common::token_balance(ctx, wallet, session).await? else {
        warn!(wallet = %wallet.pubkey(), "bought but no token account found");
        return Ok(false);
    };
    if token_balance == 0 {
        return Ok(false);
    }

    let ixs = common::sell_instructions(ctx, session, wallet, token_balance);
    let blockhash = ctx.rpc.latest_blockhash().await?;
    let sell_tx = common::sign_swap(wallet, &ixs, blockhash)?;
    let signature = ctx.rpc.send_transaction(&sell_tx, 0).await?;

    if !ctx.rpc.confirm_signature(&signature, CONFIRM_TIMEOUT).await? {
        warn!(%signature, "warmup sell did not confirm");
        return Ok(false);
    }

    info!(wallet = %wallet.pubkey(), "warmup round trip complete");
    Ok(true)
}
