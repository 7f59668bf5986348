//! Human-Paced Driver
//!
//! Mimics organic trading: two wallets buy, then one wallet sells part of
//! its position, with a randomized pause between every action. Rotates
//! through the wallet set until each wallet has sold once per round.

use rand::Rng;
use tracing::{info, warn};

use super::common;
use super::{StrategyError, TokenSession, TradeContext};
use crate::domain::sizing::SizedBuy;

#[derive(Debug, Clone)]
pub struct HumanParams {
    pub mint: solana_sdk::pubkey::Pubkey,
    /// Inter-action delay bounds, seconds.
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    /// Fraction of token balance sold per sell action, in (0, 1].
    pub sell_fraction: f64,
    /// Full rotations over the wallet set; `None` runs until interrupted.
    pub rounds: Option<u64>,
}

pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &HumanParams,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let mut session = TokenSession::open(&ctx.rpc, params.mint).await?;
    let plans = common::plan_buys(ctx, rng);
    let wallet_count = ctx.wallets.len();

    let mut round = 0u64;
    loop {
        if let Some(limit) = params.rounds {
            if round >= limit {
                return Ok(());
            }
        }
        round += 1;
        info!(round, "starting rotation");

        let mut bought = 0usize;
        let mut sold = 0usize;
        while sold < wallet_count {
            // Two buys for every sell keeps net flow positive.
            for _ in 0..2 {
                let plan = &plans[bought % wallet_count];
                bought += 1;
                buy(ctx, &mut session, plan.wallet, plan.amount_sol, rng).await?;
                tokio::time::sleep(common::uniform_delay(
                    params.min_delay_secs,
                    params.max_delay_secs,
                    rng,
                ))
                .await;
            }

            let seller = &ctx.wallets[sold % wallet_count];
            sold += 1;
            sell(ctx, &session, seller, params.sell_fraction, rng).await?;
            tokio::time::sleep(common::uniform_delay(
                params.min_delay_secs,
                params.max_delay_secs,
                rng,
            ))
            .await;
        }
    }
}

async fn buy<R: Rng>(
    ctx: &TradeContext,
    session: &mut TokenSession,
    wallet: &crate::domain::wallet::Wallet,
    amount_sol: f64,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let lamports = match common::sized_buy_for(ctx, wallet, amount_sol).await? {
        SizedBuy::Skip => {
            warn!(wallet = %wallet.pubkey(), "balance too low, skipping buy");
            return Ok(());
        }
        SizedBuy::Downsized(v) | SizedBuy::Full(v) => v,
    };

    let ixs = common::buy_instructions(ctx, session, wallet, lamports, ctx.config.slippage);
    let blockhash = ctx.rpc.latest_blockhash().await?;
    let swap = common::sign_swap(wallet, &ixs, blockhash)?;

    if ctx.config.use_jito {
        let outcome = common::submit_single_swap_bundle(ctx, swap, blockhash, rng).await?;
        info!(wallet = %wallet.pubkey(), lamports, ?outcome, "buy bundle resolved");
    } else {
        let signature = ctx.rpc.send_transaction(&swap, 0).await?;
        info!(wallet = %wallet.pubkey(), lamports, %signature, "buy sent direct");
    }
    Ok(())
}

async fn sell<R: Rng>(
    ctx: &TradeContext,
    session: &TokenSession,
    wallet: &crate::domain::wallet::Wallet,
    fraction: f64,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let Some((_, balance)) = common::token_balance(ctx, wallet, session).await? else {
        warn!(wallet = %wallet.pubkey(), "no token account, skipping sell");
        return Ok(());
    };
    let amount = (balance as f64 * fraction.clamp(0.0, 1.0)) as u64;
    if amount == 0 {
        warn!(wallet = %wallet.pubkey(), "empty token balance, skipping sell");
        return Ok(());
    }

    let ixs = common::sell_instructions(ctx, session, wallet, amount);
    let blockhash = ctx.rpc.latest_blockhash().await?;
    let swap = common::sign_swap(wallet, &ixs, blockhash)?;

    if ctx.config.use_jito {
        let outcome = common::submit_single_swap_bundle(ctx, swap, blockhash, rng).await?;
        info!(wallet = %wallet.pubkey(), amount, ?outcome, "sell bundle resolved");
    } else {
        let signature = ctx.rpc.send_transaction(&swap, 0).await?;
        info!(wallet = %wallet.pubkey(), amount, %signature, "sell sent direct");
    }
    Ok(())
}
