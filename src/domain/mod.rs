//! Core domain logic: curve pricing, wallet storage, trade sizing.

pub mod curve;
pub mod sizing;
pub mod wallet;

pub use curve::{CurveState, DEFAULT_FEE_BASIS_POINTS};
pub use sizing::{size_buy, sol_to_lamports, SizedBuy, MIN_VISIBLE_BUY_LAMPORTS};
pub use wallet::{generate_wallets, load_wallets, Wallet, WalletStoreError};
