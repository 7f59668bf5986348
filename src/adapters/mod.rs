//! External-world adapters: Solana RPC, the pump.fun program, and Jito.

pub mod jito;
pub mod pump;
pub mod solana;
