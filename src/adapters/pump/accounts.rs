//! Pump.fun Program Addresses
//!
//! Fixed program accounts and deterministic address derivation. Every address
//! here is part of the external program's expected account layout; a wrong
//! one fails silently on-chain, so they are pinned as constants and covered
//! by derivation tests.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use std::str::FromStr;

/// The bonding-curve program.
pub const PUMP_PROGRAM_ID: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";
/// Global config account.
pub const PUMP_GLOBAL: &str = "4wTV1YmiEkRvAtNtsSGPtUrqRYQMe5SKy2uB4Jjaxnjf";
/// Protocol fee recipient.
pub const PUMP_FEE_RECIPIENT: &str = "CebN5WGQ4jvEPvsVU4EoHEpgzq1VV7AbicfhtW4xC9iM";
/// Event authority PDA.
pub const PUMP_EVENT_AUTHORITY: &str = "Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1";

/// PDA seed for a token's bonding curve account.
const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";

pub fn program_id() -> Pubkey {
    Pubkey::from_str(PUMP_PROGRAM_ID).expect("static pubkey")
}

pub fn global() -> Pubkey {
    Pubkey::from_str(PUMP_GLOBAL).expect("static pubkey")
}

pub fn fee_recipient() -> Pubkey {
    Pubkey::from_str(PUMP_FEE_RECIPIENT).expect("static pubkey")
}

pub fn event_authority() -> Pubkey {
    Pubkey::from_str(PUMP_EVENT_AUTHORITY).expect("static pubkey")
}

/// A mint's bonding curve PDA and the curve's own token vault (its ATA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveAddresses {
    pub bonding_curve: Pubkey,
    pub associated_bonding_curve: Pubkey,
}

/// Derive the bonding curve accounts for a mint.
pub fn derive_curve(mint: &Pubkey) -> CurveAddresses {
    let (bonding_curve, _bump) =
        Pubkey::find_program_address(&[BONDING_CURVE_SEED, mint.as_ref()], &program_id());
    let associated_bonding_curve = get_associated_token_address(&bonding_curve, mint);
    CurveAddresses {
        bonding_curve,
        associated_bonding_curve,
    }
}

/// The trader's associated token account for a mint.
pub fn trader_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pubkeys_parse() {
        // Each constant must be a valid base58 pubkey; these are load-bearing.
        program_id();
        global();
        fee_recipient();
        event_authority();
    }

    #[test]
    fn test_curve_derivation_is_deterministic() {
        let mint = Pubkey::new_unique();
        let a = derive_curve(&mint);
        let b = derive_curve(&mint);
        assert_eq!(a, b);
        assert_ne!(a.bonding_curve, a.associated_bonding_curve);
    }

    #[test]
    fn test_distinct_mints_distinct_curves() {
        let a = derive_curve(&Pubkey::new_unique());
        let b = derive_curve(&Pubkey::new_unique());
        assert_ne!(a.bonding_curve, b.bonding_curve);
    }

    #[test]
    fn test_trader_ata_differs_from_curve_ata() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let curve = derive_curve(&mint);
        assert_ne!(
            trader_token_account(&owner, &mint),
            curve.associated_bonding_curve
        );
    }
}
