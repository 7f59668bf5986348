//! Shared driver plumbing: buy planning, swap transaction assembly, delays.

use std::time::Duration;

use rand::Rng;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::transaction::VersionedTransaction;

use super::{StrategyError, TokenSession, TradeContext};
use crate::adapters::pump;
use crate::adapters::solana::tx_builder;
use crate::domain::sizing::{size_buy, sol_to_lamports, SizedBuy};
use crate::domain::wallet::Wallet;

/// A wallet paired with its planned buy amount in SOL.
pub struct PlannedBuy<'a> {
    pub wallet: &'a Wallet,
    pub amount_sol: f64,
}

/// Plan per-wallet buy amounts: the override file wins, otherwise a uniform
/// draw from [minBuy, maxBuy] rounded to 3 decimal places.
pub fn plan_buys<'a, R: Rng>(ctx: &'a TradeContext, rng: &mut R) -> Vec<PlannedBuy<'a>> {
    ctx.wallets
        .iter()
        .enumerate()
        .map(|(idx, wallet)| {
            let amount_sol = ctx.overrides.amount_for(idx).unwrap_or_else(|| {
                let raw = rng.gen_range(ctx.config.min_buy..=ctx.config.max_buy);
                (raw * 1_000.0).round() / 1_000.0
            });
            PlannedBuy { wallet, amount_sol }
        })
        .collect()
}

/// Check the wallet's live balance and size the intended buy against it.
pub async fn sized_buy_for(
    ctx: &TradeContext,
    wallet: &Wallet,
    amount_sol: f64,
) -> Result<SizedBuy, StrategyError> {
    let balance = ctx.rpc.get_balance(&wallet.pubkey()).await?;
    Ok(size_buy(balance, sol_to_lamports(amount_sol)))
}

/// Instruction list for one wallet's buy: compute budget, idempotent ATA
/// creation, then the swap itself with a slippage-padded max cost.
pub fn buy_instructions(
    ctx: &TradeContext,
    session: &mut TokenSession,
    wallet: &Wallet,
    lamports: u64,
    slippage: f64,
) -> Vec<Instruction> {
    let tokens_out = session.state.apply_buy(lamports);
    let max_sol_cost = lamports + (lamports as f64 * slippage) as u64;

    let trader = wallet.pubkey();
    let mut ixs = tx_builder::compute_budget_instructions(
        ctx.config.compute_unit,
        ctx.config.compute_limit,
    );
    ixs.push(tx_builder::create_ata_instruction(
        &trader,
        &trader,
        &session.mint,
    ));
    ixs.push(pump::buy_instruction(
        &session.mint,
        &session.curve,
        &trader,
        tokens_out,
        max_sol_cost,
    ));
    ixs
}

/// Instruction list for one wallet's sell of `token_amount` raw units.
pub fn sell_instructions(
    ctx: &TradeContext,
    session: &TokenSession,
    wallet: &Wallet,
    token_amount: u64,
) -> Vec<Instruction> {
    let mut ixs = tx_builder::compute_budget_instructions(
        ctx.config.compute_unit,
        ctx.config.compute_limit,
    );
    ixs.push(pump::sell_instruction(
        &session.mint,
        &session.curve,
        &wallet.pubkey(),
        token_amount,
    ));
    ixs
}

/// Sign a single-wallet swap transaction.
pub fn sign_swap(
    wallet: &Wallet,
    instructions: &[Instruction],
    blockhash: Hash,
) -> Result<VersionedTransaction, StrategyError> {
    Ok(tx_builder::build_transaction(
        wallet.keypair(),
        instructions,
        &[],
        blockhash,
    )?)
}

/// Submit one swap transaction as a tip-carrying bundle and resolve it.
pub async fn submit_single_swap_bundle<R: Rng>(
    ctx: &TradeContext,
    swap: VersionedTransaction,
    blockhash: Hash,
    rng: &mut R,
) -> Result<crate::adapters::jito::BundleOutcome, StrategyError> {
    let tip_payer = ctx.config.tip_payer()?;
    let tip = crate::adapters::jito::build_tip_transaction(
        &tip_payer,
        ctx.config.tip_lamports(),
        blockhash,
        rng,
    )?;
    let bundle = crate::adapters::jito::assemble_bundle(vec![swap], tip)?;
    Ok(ctx.jito.submit_and_confirm(&bundle).await?)
}

/// Token balance of a wallet's account for the session mint, if it has one.
pub async fn token_balance(
    ctx: &TradeContext,
    wallet: &Wallet,
    session: &TokenSession,
) -> Result<Option<(solana_sdk::pubkey::Pubkey, u64)>, StrategyError> {
    let Some(account) = ctx
        .rpc
        .find_token_account(&wallet.pubkey(), &session.mint)
        .await?
    else {
        return Ok(None);
    };
    let balance = ctx.rpc.get_token_balance(&account).await?;
    Ok(Some((account, balance)))
}

/// Uniform random delay in [min, max] seconds.
pub fn uniform_delay<R: Rng>(min_secs: f64, max_secs: f64, rng: &mut R) -> Duration {
    let secs = if max_secs > min_secs {
        rng.gen_range(min_secs..=max_secs)
    } else {
        min_secs
    };
    Duration::from_secs_f64(secs.max(0.0))
}
