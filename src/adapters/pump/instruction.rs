//! Pump.fun Instruction Codec
//!
//! Byte-exact encoding of the program's buy and sell instructions. The
//! discriminators and the account ordering are protocol constants: the
//! program gives no local validation, and a single wrong byte or swapped
//! account is a silent on-chain rejection.

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;
use solana_sdk::sysvar::rent;

use super::accounts::{self, CurveAddresses};

/// 8-byte Anchor discriminator for `buy`.
pub const BUY_DISCRIMINATOR: [u8; 8] = [0x66, 0x06, 0x3d, 0x12, 0x01, 0xda, 0xeb, 0xea];
/// 8-byte Anchor discriminator for `sell` (LE of 12502976635542562355).
pub const SELL_DISCRIMINATOR: [u8; 8] = 12502976635542562355u64.to_le_bytes();

/// Encode the data payload for a buy: discriminator, token amount out
/// (raw 6-decimal units), max SOL cost in lamports.
pub fn encode_buy(token_amount: u64, max_sol_cost: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(24);
    data.extend_from_slice(&BUY_DISCRIMINATOR);
    data.extend_from_slice(&token_amount.to_le_bytes());
    data.extend_from_slice(&max_sol_cost.to_le_bytes());
    data
}

/// Encode the data payload for a sell: discriminator, token amount in,
/// minimum SOL output (always 0 here; the curve quote is advisory only).
pub fn encode_sell(token_amount: u64, min_sol_output: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(24);
    data.extend_from_slice(&SELL_DISCRIMINATOR);
    data.extend_from_slice(&token_amount.to_le_bytes());
    data.extend_from_slice(&min_sol_output.to_le_bytes());
    data
}

/// Decode a buy payload back to (token_amount, max_sol_cost).
pub fn decode_buy(data: &[u8]) -> Option<(u64, u64)> {
    decode_with_discriminator(data, &BUY_DISCRIMINATOR)
}

/// Decode a sell payload back to (token_amount, min_sol_output).
pub fn decode_sell(data: &[u8]) -> Option<(u64, u64)> {
    decode_with_discriminator(data, &SELL_DISCRIMINATOR)
}

fn decode_with_discriminator(data: &[u8], discriminator: &[u8; 8]) -> Option<(u64, u64)> {
    if data.len() != 24 || &data[..8] != discriminator {
        return None;
    }
    let first = u64::from_le_bytes(data[8..16].try_into().ok()?);
    let second = u64::from_le_bytes(data[16..24].try_into().ok()?);
    Some((first, second))
}

/// Build the buy instruction for a trader.
///
/// Account order (fixed by the program): global, fee recipient (w), mint,
/// bonding curve (w), curve vault (w), trader ATA (w), trader (s, w),
/// system program, token program, rent sysvar, event authority, program.
pub fn buy_instruction(
    mint: &Pubkey,
    curve: &CurveAddresses,
    trader: &Pubkey,
    token_amount: u64,
    max_sol_cost: u64,
) -> Instruction {
    let trader_ata = accounts::trader_token_account(trader, mint);
    Instruction {
        program_id: accounts::program_id(),
        accounts: vec![
            AccountMeta::new_readonly(accounts::global(), false),
            AccountMeta::new(accounts::fee_recipient(), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(curve.bonding_curve, false),
            AccountMeta::new(curve.associated_bonding_curve, false),
            AccountMeta::new(trader_ata, false),
            AccountMeta::new(*trader, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(rent::id(), false),
            AccountMeta::new_readonly(accounts::event_authority(), false),
            AccountMeta::new_readonly(accounts::program_id(), false),
        ],
        data: encode_buy(token_amount, max_sol_cost),
    }
}

/// Build the sell instruction for a trader.
///
/// Same shape as the buy, except slots 8/9 hold the associated-token and
/// token programs instead of the token program and rent sysvar.
pub fn sell_instruction(
    mint: &Pubkey,
    curve: &CurveAddresses,
    trader: &Pubkey,
    token_amount: u64,
) -> Instruction {
    let trader_ata = accounts::trader_token_account(trader, mint);
    Instruction {
        program_id: accounts::program_id(),
        accounts: vec![
            AccountMeta::new_readonly(accounts::global(), false),
            AccountMeta::new(accounts::fee_recipient(), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(curve.bonding_curve, false),
            AccountMeta::new(curve.associated_bonding_curve, false),
            AccountMeta::new(trader_ata, false),
            AccountMeta::new(*trader, true),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(accounts::event_authority(), false),
            AccountMeta::new_readonly(accounts::program_id(), false),
        ],
        data: encode_sell(token_amount, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pump::accounts::derive_curve;

    #[test]
    fn test_buy_payload_layout() {
        let data = encode_buy(1, 2);
        assert_eq!(data.len(), 24);
        assert_eq!(&data[..8], &BUY_DISCRIMINATOR);
        assert_eq!(&data[8..16], &1u64.to_le_bytes());
        assert_eq!(&data[16..24], &2u64.to_le_bytes());
    }

    #[test]
    fn test_buy_round_trip() {
        let (amount, max_cost) = (123_456_789_012_345, 987_654_321);
        let decoded = decode_buy(&encode_buy(amount, max_cost)).unwrap();
        assert_eq!(decoded, (amount, max_cost));
    }

    #[test]
    fn test_sell_round_trip() {
        let decoded = decode_sell(&encode_sell(42_000_000, 0)).unwrap();
        assert_eq!(decoded, (42_000_000, 0));
    }

    #[test]
    fn test_decode_rejects_wrong_discriminator() {
        assert!(decode_sell(&encode_buy(1, 1)).is_none());
        assert!(decode_buy(&encode_sell(1, 1)).is_none());
        assert!(decode_buy(&[0u8; 23]).is_none());
    }

    #[test]
    fn test_sell_discriminator_bytes() {
        // LE bytes of the program's sell discriminator integer.
        assert_eq!(
            SELL_DISCRIMINATOR,
            [0x33, 0xe6, 0x85, 0xa4, 0x01, 0x7f, 0x83, 0xad]
        );
    }

    #[test]
    fn test_buy_account_layout() {
        let mint = Pubkey::new_unique();
        let trader = Pubkey::new_unique();
        let curve = derive_curve(&mint);
        let ix = buy_instruction(&mint, &curve, &trader, 100, 200);

        assert_eq!(ix.program_id, accounts::program_id());
        assert_eq!(ix.accounts.len(), 12);

        // Writability flags are fixed per slot.
        let writable: Vec<bool> = ix.accounts.iter().map(|a| a.is_writable).collect();
        assert_eq!(
            writable,
            [false, true, false, true, true, true, true, false, false, false, false, false]
        );
        // Only the trader signs.
        assert_eq!(ix.accounts.iter().filter(|a| a.is_signer).count(), 1);
        assert_eq!(ix.accounts[6].pubkey, trader);
        assert_eq!(ix.accounts[3].pubkey, curve.bonding_curve);
        assert_eq!(ix.accounts[9].pubkey, rent::id());
    }

    #[test]
    fn test_sell_account_layout() {
        let mint = Pubkey::new_unique();
        let trader = Pubkey::new_unique();
        let curve = derive_curve(&mint);
        let ix = sell_instruction(&mint, &curve, &trader, 100);

        assert_eq!(ix.accounts.len(), 12);
        assert_eq!(ix.accounts[8].pubkey, spl_associated_token_account::id());
        assert_eq!(ix.accounts[9].pubkey, spl_token::id());
        assert_eq!(ix.accounts[11].pubkey, accounts::program_id());
        assert_eq!(decode_sell(&ix.data), Some((100, 0)));
    }
}
