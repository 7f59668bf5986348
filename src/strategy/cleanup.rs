//! Cleanup Driver
//!
//! End-of-run teardown: each wallet sells whatever remains of the token and
//! closes its associated token account, reclaiming the rent lamports back to
//! the wallet. Curves that migrated or disappeared are skipped; those tokens
//! can no longer be sold here.

use std::time::Duration;

use rand::Rng;
use solana_sdk::instruction::Instruction;
use tracing::{info, warn};

use super::common;
use super::{StrategyError, TokenSession, TradeContext};

#[derive(Debug, Clone)]
pub struct CleanupParams {
    pub mint: solana_sdk::pubkey::Pubkey,
    /// Pause between wallets.
    pub delay: Duration,
}

pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &CleanupParams,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let session = match TokenSession::open(&ctx.rpc, params.mint).await {
        Ok(s) => s,
        Err(e @ StrategyError::CurveComplete(_)) | Err(e @ StrategyError::Reserves(_)) => {
            warn!(error = %e, "curve unavailable, nothing to clean up on this venue");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for wallet in &ctx.wallets {
        let Some((token_account, balance)) =
            common::token_balance(ctx, wallet, &session).await?
        else {
            continue;
        };

        let mut ixs: Vec<Instruction> = Vec::new();
        if balance > 0 {
            info!(wallet = %wallet.pubkey(), balance, "selling remainder");
            ixs.extend(common::sell_instructions(ctx, &session, wallet, balance));
        }
        // Close after the sell so the account is empty when it's reclaimed.
        ixs.push(close_account_instruction(wallet, &token_account)?);

        let blockhash = ctx.rpc.latest_blockhash().await?;
        let swap = common::sign_swap(wallet, &ixs, blockhash)?;

        if ctx.config.use_jito {
            let outcome = common::submit_single_swap_bundle(ctx, swap, blockhash, rng).await?;
            info!(wallet = %wallet.pubkey(), ?outcome, "cleanup bundle resolved");
        } else {
            let signature = ctx.rpc.send_transaction(&swap, 0).await?;
            info!(wallet = %wallet.pubkey(), %signature, "cleanup sent direct");
        }

        tokio::time::sleep(params.delay).await;
    }

    Ok(())
}

fn close_account_instruction(
    wallet: &crate::domain::wallet::Wallet,
    token_account: &solana_sdk::pubkey::Pubkey,
) -> Result<Instruction, StrategyError> {
    let owner = wallet.pubkey();
    spl_token::instruction::close_account(
        &spl_token::id(),
        token_account,
        &owner,
        &owner,
        &[&owner],
    )
    .map_err(|e| {
        StrategyError::Build(crate::adapters::solana::BuildError::Compile(e.to_string()))
    })
}
