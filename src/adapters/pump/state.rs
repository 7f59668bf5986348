//! Bonding Curve Account State
//!
//! On-chain layout of a pump.fun bonding curve account and its fetch path.
//! A curve that cannot be found or decoded has migrated off the venue (or
//! never existed); callers must abandon the token rather than retry.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::adapters::solana::rpc::{RpcError, SolanaRpc};
use crate::domain::curve::{CurveState, DEFAULT_FEE_BASIS_POINTS};

/// Anchor account discriminator length.
const DISCRIMINATOR_LEN: usize = 8;
/// Five LE u64 reserve fields plus the `complete` flag byte.
const CURVE_DATA_LEN: usize = 5 * 8 + 1;

#[derive(Debug, Error)]
pub enum ReserveFetchError {
    #[error("curve account {0} not found (token likely migrated)")]
    AccountNotFound(Pubkey),
    #[error("curve account {pubkey} undecodable: {reason}")]
    Undecodable { pubkey: Pubkey, reason: String },
    #[error("rpc failure fetching curve account: {0}")]
    Rpc(#[from] RpcError),
}

impl ReserveFetchError {
    /// Missing or garbage account data means the curve is gone from this
    /// venue; there is nothing to retry.
    pub fn is_abandon(&self) -> bool {
        matches!(
            self,
            ReserveFetchError::AccountNotFound(_) | ReserveFetchError::Undecodable { .. }
        )
    }
}

/// Decode a raw bonding curve account into a [`CurveState`].
///
/// Layout after the 8-byte discriminator: virtual_token_reserves,
/// virtual_sol_reserves, real_token_reserves, real_sol_reserves,
/// token_total_supply (all LE u64), then `complete: bool`.
pub fn decode_curve_account(pubkey: &Pubkey, data: &[u8]) -> Result<CurveSnapshot, ReserveFetchError> {
    if data.len() < DISCRIMINATOR_LEN + CURVE_DATA_LEN {
        return Err(ReserveFetchError::Undecodable {
            pubkey: *pubkey,
            reason: format!("account data too short: {} bytes", data.len()),
        });
    }

    let body = &data[DISCRIMINATOR_LEN..];
    let read_u64 = |i: usize| -> u64 {
        let start = i * 8;
        u64::from_le_bytes(body[start..start + 8].try_into().expect("8-byte slice"))
    };

    Ok(CurveSnapshot {
        state: CurveState {
            virtual_token_reserves: read_u64(0),
            virtual_sol_reserves: read_u64(1),
            real_token_reserves: read_u64(2),
            real_sol_reserves: read_u64(3),
            token_total_supply: read_u64(4),
            fee_basis_points: DEFAULT_FEE_BASIS_POINTS,
        },
        complete: body[40] != 0,
    })
}

/// A decoded curve account: reserve state plus the migration flag.
#[derive(Debug, Clone, Copy)]
pub struct CurveSnapshot {
    pub state: CurveState,
    /// Set once the curve fills and liquidity migrates to the AMM.
    pub complete: bool,
}

/// Fetch and decode the bonding curve account for a session.
pub async fn fetch_curve_state(
    rpc: &SolanaRpc,
    bonding_curve: &Pubkey,
) -> Result<CurveSnapshot, ReserveFetchError> {
    let data = rpc
        .get_account_data(bonding_curve)
        .await
        .map_err(|e| match e {
            RpcError::AccountNotFound(pk) => ReserveFetchError::AccountNotFound(pk),
            other => ReserveFetchError::Rpc(other),
        })?;

    decode_curve_account(bonding_curve, &data)
}
