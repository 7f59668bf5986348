//! pumpvol - pump.fun bonding-curve volume bot
//!
//! Multi-wallet buy/sell automation against the pump.fun bonding curve, with
//! local constant-product pricing, byte-exact instruction encoding, and
//! Jito bundle submission across all regional block engines.
//!
//! # Modules
//!
//! - `domain`: curve pricing, trade sizing, wallet store
//! - `adapters`: Solana RPC, the pump.fun program interface, Jito bundles
//! - `config`: JSON config and per-wallet amount overrides
//! - `strategy`: the trading drivers (bulk, human, stagger, micro, sell,
//!   warmup, fund, cleanup)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod strategy;
