//! Pump.fun venue adapter: program addresses, instruction codec, curve state.

pub mod accounts;
pub mod instruction;
pub mod state;

pub use accounts::{derive_curve, trader_token_account, CurveAddresses};
pub use instruction::{buy_instruction, sell_instruction};
pub use state::{fetch_curve_state, CurveSnapshot, ReserveFetchError};
