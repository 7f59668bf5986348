//! Solana chain adapters: RPC access and transaction assembly.

pub mod rpc;
pub mod tx_builder;

pub use rpc::{RpcError, SolanaRpc};
pub use tx_builder::{build_transaction, build_transfer, BuildError};
