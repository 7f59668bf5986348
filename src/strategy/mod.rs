//! Strategy Drivers
//!
//! Each driver is a loop over the wallet set: pick a wallet, price the trade
//! against the local curve snapshot, build and sign the transaction, bundle
//! (or send direct), wait out the delay policy, repeat. Drivers share one
//! [`TradeContext`] and never run concurrently with each other; the curve
//! snapshot is advanced serially inside a single driver loop.

pub mod bulk;
pub mod cleanup;
pub mod common;
pub mod fund;
pub mod human;
pub mod micro;
pub mod refund;
pub mod sell;
pub mod stagger;
pub mod transfer;
pub mod warmup;

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::adapters::jito::bundle::BundleError;
use crate::adapters::jito::{JitoClient, JitoError};
use crate::adapters::pump::{self, CurveAddresses, ReserveFetchError};
use crate::adapters::solana::{BuildError, RpcError, SolanaRpc};
use crate::config::{AmountOverrides, BotConfig, ConfigError};
use crate::domain::curve::CurveState;
use crate::domain::wallet::{Wallet, WalletStoreError};

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error(transparent)]
    Jito(#[from] JitoError),
    #[error(transparent)]
    Reserves(#[from] ReserveFetchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Wallets(#[from] WalletStoreError),
    #[error("no wallets loaded")]
    NoWallets,
    #[error("token {0} has migrated off the bonding curve")]
    CurveComplete(Pubkey),
}

/// Everything a driver needs: chain access, relay access, config, wallets.
pub struct TradeContext {
    pub rpc: SolanaRpc,
    pub jito: JitoClient,
    pub config: BotConfig,
    pub wallets: Vec<Wallet>,
    pub overrides: AmountOverrides,
}

impl TradeContext {
    pub fn new(
        rpc: SolanaRpc,
        jito: JitoClient,
        config: BotConfig,
        wallets: Vec<Wallet>,
        overrides: AmountOverrides,
    ) -> Result<Self, StrategyError> {
        if wallets.is_empty() {
            return Err(StrategyError::NoWallets);
        }
        Ok(Self {
            rpc,
            jito,
            config,
            wallets,
            overrides,
        })
    }
}

/// One token's trading session: derived addresses plus the locally-tracked
/// reserve snapshot, fetched once at open and advanced per buy.
#[derive(Debug, Clone)]
pub struct TokenSession {
    pub mint: Pubkey,
    pub curve: CurveAddresses,
    pub state: CurveState,
}

impl TokenSession {
    /// Derive the curve accounts and pull the initial reserve state.
    ///
    /// A complete curve has migrated to the AMM; nothing here can trade it.
    pub async fn open(rpc: &SolanaRpc, mint: Pubkey) -> Result<Self, StrategyError> {
        let curve = pump::derive_curve(&mint);
        let snapshot = pump::fetch_curve_state(rpc, &curve.bonding_curve).await?;
        if snapshot.complete {
            return Err(StrategyError::CurveComplete(mint));
        }
        Ok(Self {
            mint,
            curve,
            state: snapshot.state,
        })
    }
}
