//! Bundle Assembly
//!
//! Groups signed swap transactions into block-engine bundles. Each bundle
//! carries at most four swaps plus exactly one flat-amount tip transfer in
//! the final slot; tips piggybacked inside swap transactions would be lost
//! whenever that swap alone failed.

use rand::Rng;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Keypair;
use solana_sdk::transaction::VersionedTransaction;
use thiserror::Error;

use super::client::MAX_BUNDLE_TRANSACTIONS;
use super::config::pick_tip_account;
use crate::adapters::solana::tx_builder::{build_transfer, BuildError};

/// Swap transactions per bundle, leaving one slot for the tip.
pub const MAX_SWAPS_PER_BUNDLE: usize = MAX_BUNDLE_TRANSACTIONS - 1;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("no swap transactions to bundle")]
    Empty,
    #[error("{count} swaps exceed the {max} per-bundle limit")]
    TooManySwaps { count: usize, max: usize },
    #[error("tip transaction build failed: {0}")]
    Tip(#[from] BuildError),
}

/// Split signed swaps into bundle-sized groups.
pub fn chunk_swaps(swaps: Vec<VersionedTransaction>) -> Vec<Vec<VersionedTransaction>> {
    let mut groups = Vec::new();
    let mut iter = swaps.into_iter().peekable();
    while iter.peek().is_some() {
        groups.push(iter.by_ref().take(MAX_SWAPS_PER_BUNDLE).collect());
    }
    groups
}

/// Build the tip transfer for one bundle: a flat-amount system transfer from
/// the tip payer to a randomly chosen tip account.
pub fn build_tip_transaction<R: Rng>(
    tip_payer: &Keypair,
    tip_lamports: u64,
    blockhash: Hash,
    rng: &mut R,
) -> Result<VersionedTransaction, BuildError> {
    let tip_account = pick_tip_account(rng);
    build_transfer(tip_payer, &tip_account, tip_lamports, blockhash)
}

/// Assemble one bundle: the swaps in order, then the tip transaction last.
pub fn assemble_bundle(
    swaps: Vec<VersionedTransaction>,
    tip: VersionedTransaction,
) -> Result<Vec<VersionedTransaction>, BundleError> {
    if swaps.is_empty() {
        return Err(BundleError::Empty);
    }
    if swaps.len() > MAX_SWAPS_PER_BUNDLE {
        return Err(BundleError::TooManySwaps {
            count: swaps.len(),
            max: MAX_SWAPS_PER_BUNDLE,
        });
    }

    let mut bundle = swaps;
    bundle.push(tip);
    Ok(bundle)
}
