//! Bulk Buy Driver
//!
//! Buys across the whole wallet set in batches: two wallets' swaps share one
//! transaction, up to ten wallets form a batch, and each batch is bundled
//! and submitted atomically. Slippage tolerance widens slightly per batch to
//! absorb the cumulative price impact of earlier batches in the same run.

use std::time::Duration;

use rand::Rng;
use solana_sdk::transaction::VersionedTransaction;
use tracing::{info, warn};

use super::common::{self, PlannedBuy};
use super::{StrategyError, TokenSession, TradeContext};
use crate::adapters::jito::{assemble_bundle, build_tip_transaction, chunk_swaps, BundleOutcome};
use crate::adapters::solana::{tx_builder, RpcError};
use crate::domain::sizing::SizedBuy;

/// Wallets per batch; one bundle group.
pub const BATCH_SIZE: usize = 10;
/// Wallets sharing a single transaction.
pub const WALLETS_PER_TX: usize = 2;
/// Extra slippage tolerance added after each submitted batch.
pub const SLIPPAGE_STEP: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct BulkBuyParams {
    pub mint: solana_sdk::pubkey::Pubkey,
    /// Pause between batches.
    pub delay: Duration,
}

/// Run the bulk buy over every wallet once. Returns total SOL volume bought.
pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &BulkBuyParams,
    rng: &mut R,
) -> Result<f64, StrategyError> {
    let mut session = TokenSession::open(&ctx.rpc, params.mint).await?;
    let plans = common::plan_buys(ctx, rng);
    let mut slippage = ctx.config.slippage;
    let mut total_volume_sol = 0.0;

    for (batch_no, batch) in plans.chunks(BATCH_SIZE).enumerate() {
        info!(batch = batch_no + 1, wallets = batch.len(), "starting batch");

        let (swaps, batch_volume_sol) = build_batch(ctx, &mut session, batch, slippage).await?;
        if swaps.is_empty() {
            warn!(batch = batch_no + 1, "no viable wallets in batch, skipping");
            continue;
        }

        // Fail fast on the whole batch if the first transaction won't execute;
        // later batches still run.
        if let Err(RpcError::SimulationFailed(reason)) = ctx.rpc.simulate(&swaps[0]).await {
            warn!(batch = batch_no + 1, %reason, "simulation failed, aborting batch");
            continue;
        }

        let tip_payer = ctx.config.tip_payer()?;
        let mut outcomes = Vec::new();
        for group in chunk_swaps(swaps) {
            let blockhash = ctx.rpc.latest_blockhash().await?;
            let tip =
                build_tip_transaction(&tip_payer, ctx.config.tip_lamports(), blockhash, rng)?;
            let bundle = assemble_bundle(group, tip)?;
            let outcome = ctx.jito.submit_and_confirm(&bundle).await?;
            info!(?outcome, "bundle resolved");
            outcomes.push(outcome);
        }

        // A batch only counts toward volume once every bundle of it landed;
        // aborted or rejected batches contribute nothing.
        if batch_landed(&outcomes) {
            total_volume_sol += batch_volume_sol;
        }

        slippage += SLIPPAGE_STEP;
        tokio::time::sleep(params.delay).await;
    }

    info!(total_volume_sol, "bulk buy complete");
    Ok(total_volume_sol)
}

/// True when every bundle of the batch resolved successfully.
fn batch_landed(outcomes: &[BundleOutcome]) -> bool {
    !outcomes.is_empty() && outcomes.iter().all(BundleOutcome::is_success)
}

/// Build the batch's signed transactions, two wallets per transaction.
/// Returns the swaps and the SOL volume they would move if they land.
async fn build_batch(
    ctx: &TradeContext,
    session: &mut TokenSession,
    batch: &[PlannedBuy<'_>],
    slippage: f64,
) -> Result<(Vec<VersionedTransaction>, f64), StrategyError> {
    let mut swaps = Vec::new();
    let mut volume_sol = 0.0;

    for pair in batch.chunks(WALLETS_PER_TX) {
        let mut instructions = Vec::new();
        let mut signers = Vec::new();

        for plan in pair {
            let sized = common::sized_buy_for(ctx, plan.wallet, plan.amount_sol).await?;
            let lamports = match sized {
                SizedBuy::Skip => {
                    warn!(wallet = %plan.wallet.pubkey(), "balance too low, skipping");
                    continue;
                }
                SizedBuy::Downsized(lamports) => {
                    warn!(wallet = %plan.wallet.pubkey(), lamports, "downsized buy to 75% of balance");
                    lamports
                }
                SizedBuy::Full(lamports) => lamports,
            };

            info!(wallet = %plan.wallet.pubkey(), lamports, "adding buy");
            instructions.extend(common::buy_instructions(
                ctx, session, plan.wallet, lamports, slippage,
            ));
            signers.push(plan.wallet);
            volume_sol += lamports as f64 / 1e9;
        }

        if signers.is_empty() {
            continue;
        }

        let blockhash = ctx.rpc.latest_blockhash().await?;
        let extra: Vec<&solana_sdk::signature::Keypair> =
            signers[1..].iter().map(|w| w.keypair()).collect();
        let tx = tx_builder::build_transaction(
            signers[0].keypair(),
            &instructions,
            &extra,
            blockhash,
        )?;
        swaps.push(tx);
    }

    Ok((swaps, volume_sol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::jito::{JitoClient, JitoConfig};
    use crate::adapters::solana::SolanaRpc;
    use crate::config::{AmountOverrides, BotConfig};
    use crate::domain::wallet::Wallet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_context(wallet_count: usize) -> TradeContext {
        let config: BotConfig = serde_json::from_str(
            r#"{
                "rpc": "https://example.com",
                "minBuy": 0.1,
                "maxBuy": 0.5,
                "microBuyAmount": 0.01,
                "computeUnit": 100000,
                "computeLimit": 200000,
                "blockEngineUrl": "https://ny.mainnet.block-engine.jito.wtf",
                "jitoTipPK": "somekey",
                "jitoTipAmount": 0.001,
                "sender": "somekey",
                "devWallet": "7rhxnLV8C77o6d8oz26AgK8x8m5ePsdeRawjqvojbjnQ",
                "delay": 1.0,
                "slippage": 0.15,
                "useJITO": true
            }"#,
        )
        .unwrap();
        let rpc = SolanaRpc::new(config.rpc.clone());
        let jito = JitoClient::new(JitoConfig::default()).unwrap();
        let wallets = (0..wallet_count).map(|_| Wallet::generate()).collect();
        TradeContext::new(rpc, jito, config, wallets, AmountOverrides::default()).unwrap()
    }

    #[test]
    fn test_batch_constants_fit_bundle_limits() {
        // Ten wallets at two per transaction is five swaps; the assembler
        // splits those across bundles of at most four swaps plus a tip.
        let txs_per_batch = BATCH_SIZE / WALLETS_PER_TX;
        assert_eq!(txs_per_batch, 5);
        assert!(crate::adapters::jito::MAX_SWAPS_PER_BUNDLE < txs_per_batch);
    }

    #[test]
    fn test_twelve_wallets_split_into_ten_plus_two() {
        let ctx = test_context(12);
        let mut rng = StdRng::seed_from_u64(9);

        let plans = common::plan_buys(&ctx, &mut rng);
        assert_eq!(plans.len(), 12);

        let sizes: Vec<usize> = plans.chunks(BATCH_SIZE).map(|b| b.len()).collect();
        assert_eq!(sizes, [10, 2]);
        for plan in &plans {
            assert!(plan.amount_sol >= ctx.config.min_buy);
            assert!(plan.amount_sol <= ctx.config.max_buy);
        }
    }

    #[test]
    fn test_unsubmitted_batch_counts_no_volume() {
        // No outcomes means the batch never reached the block engine.
        assert!(!batch_landed(&[]));
        assert!(batch_landed(&[
            BundleOutcome::Landed { slot: 1 },
            BundleOutcome::AlreadyProcessed,
        ]));
        assert!(!batch_landed(&[
            BundleOutcome::Landed { slot: 1 },
            BundleOutcome::Indeterminate,
        ]));
        assert!(!batch_landed(&[BundleOutcome::Rejected {
            reason: "simulation failure".into(),
        }]));
    }
}
