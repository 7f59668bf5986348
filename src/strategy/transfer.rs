//! Token Transfer Driver
//!
//! Moves every trading wallet's token balance to a single receiver, six
//! wallets per transaction and up to four transactions per tipped bundle.
//! The receiver's token account is created idempotently in the first
//! transaction only; later ones can assume it exists.

use rand::Rng;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::transaction::VersionedTransaction;
use tracing::{info, warn};

use super::{StrategyError, TradeContext};
use crate::adapters::jito::{assemble_bundle, build_tip_transaction, MAX_SWAPS_PER_BUNDLE};
use crate::adapters::pump;
use crate::adapters::solana::{tx_builder, BuildError};
use crate::domain::wallet::Wallet;

/// Senders per transfer transaction.
pub const WALLETS_PER_TX: usize = 6;

/// A wallet below this can't pay its share of fees; leave its tokens alone.
const MIN_FEE_BALANCE_LAMPORTS: u64 = 1_000_000;

/// Pump.fun mints are all 6-decimal.
const TOKEN_DECIMALS: u8 = 6;

#[derive(Debug, Clone)]
pub struct TransferParams {
    pub mint: Pubkey,
    /// Receiving wallet; tokens land in its associated token account.
    pub receiver: Pubkey,
}

pub async fn run<R: Rng>(
    ctx: &TradeContext,
    params: &TransferParams,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let receiver_ata = pump::trader_token_account(&params.receiver, &params.mint);

    // Collect the wallets that hold something and can pay to move it.
    let mut holdings: Vec<(&Wallet, Pubkey, u64)> = Vec::new();
    for wallet in &ctx.wallets {
        let balance = ctx.rpc.get_balance(&wallet.pubkey()).await?;
        if balance < MIN_FEE_BALANCE_LAMPORTS {
            warn!(wallet = %wallet.pubkey(), balance, "too little SOL to transfer, skipping");
            continue;
        }
        let Some(account) = ctx
            .rpc
            .find_token_account(&wallet.pubkey(), &params.mint)
            .await?
        else {
            continue;
        };
        let amount = ctx.rpc.get_token_balance(&account).await?;
        if amount == 0 {
            continue;
        }
        holdings.push((wallet, account, amount));
    }
    if holdings.is_empty() {
        info!("no token balances to transfer");
        return Ok(());
    }

    let tip_payer = ctx.config.tip_payer()?;
    let mut first_tx = true;

    for bundle_group in holdings.chunks(WALLETS_PER_TX * MAX_SWAPS_PER_BUNDLE) {
        let blockhash = ctx.rpc.latest_blockhash().await?;
        let mut transfers: Vec<VersionedTransaction> = Vec::new();

        for chunk in bundle_group.chunks(WALLETS_PER_TX) {
            let payer = chunk[0].0;
            let mut instructions: Vec<Instruction> = Vec::new();
            if first_tx {
                instructions.push(tx_builder::create_ata_instruction(
                    &payer.pubkey(),
                    &params.receiver,
                    &params.mint,
                ));
                first_tx = false;
            }
            for (wallet, account, amount) in chunk {
                instructions.push(token_transfer_instruction(
                    account,
                    &params.mint,
                    &receiver_ata,
                    &wallet.pubkey(),
                    *amount,
                )?);
            }
            let extra: Vec<&Keypair> = chunk[1..].iter().map(|(w, _, _)| w.keypair()).collect();
            transfers.push(tx_builder::build_transaction(
                payer.keypair(),
                &instructions,
                &extra,
                blockhash,
            )?);
        }

        let tip = build_tip_transaction(&tip_payer, ctx.config.tip_lamports(), blockhash, rng)?;
        let bundle = assemble_bundle(transfers, tip)?;
        let outcome = ctx.jito.submit_and_confirm(&bundle).await?;
        info!(?outcome, wallets = bundle_group.len(), "transfer bundle resolved");
    }

    Ok(())
}

fn token_transfer_instruction(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, StrategyError> {
    spl_token::instruction::transfer_checked(
        &spl_token::id(),
        source,
        mint,
        destination,
        owner,
        &[],
        amount,
        TOKEN_DECIMALS,
    )
    .map_err(|e| StrategyError::Build(BuildError::Compile(e.to_string())))
}
