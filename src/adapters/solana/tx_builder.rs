//! Versioned Transaction Builder
//!
//! Assembles v0 transactions for swap legs and tips: compute-budget prefix,
//! optional idempotent ATA creation, then the swap instructions, signed by
//! every participating wallet. Oversize transactions are rejected locally
//! before they can waste a bundle slot.

use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::{v0, VersionedMessage};
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::system_instruction;
use solana_sdk::transaction::VersionedTransaction;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("message compilation failed: {0}")]
    Compile(String),
    #[error("signing failed: {0}")]
    Sign(String),
    #[error("transaction serialization failed: {0}")]
    Serialize(String),
    #[error("transaction too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
}

/// Compute budget attached to every swap transaction. The price is priced
/// for inclusion without an auction; bundles carry their own tip.
pub const DEFAULT_UNIT_PRICE_MICRO_LAMPORTS: u64 = 100_000;
pub const DEFAULT_UNIT_LIMIT: u32 = 200_000;

/// Compute-budget instruction pair prepended to swap transactions.
pub fn compute_budget_instructions(unit_price: u64, unit_limit: u32) -> Vec<Instruction> {
    vec![
        ComputeBudgetInstruction::set_compute_unit_price(unit_price),
        ComputeBudgetInstruction::set_compute_unit_limit(unit_limit),
    ]
}

/// Idempotent ATA creation for a trader. Safe to include on every buy; the
/// instruction is a no-op when the account already exists.
pub fn create_ata_instruction(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(payer, owner, mint, &spl_token::id())
}

/// Compile and sign a v0 transaction.
///
/// `payer` must be the first signer; additional signers cover multi-wallet
/// transactions where two traders share one transaction.
pub fn build_transaction(
    payer: &Keypair,
    instructions: &[Instruction],
    extra_signers: &[&Keypair],
    blockhash: Hash,
) -> Result<VersionedTransaction, BuildError> {
    let payer_pubkey = solana_sdk::signer::Signer::pubkey(payer);
    let message = v0::Message::try_compile(&payer_pubkey, instructions, &[], blockhash)
        .map_err(|e| BuildError::Compile(e.to_string()))?;

    let mut signers: Vec<&Keypair> = vec![payer];
    signers.extend_from_slice(extra_signers);

    let transaction = VersionedTransaction::try_new(VersionedMessage::V0(message), &signers)
        .map_err(|e| BuildError::Sign(e.to_string()))?;

    let size = bincode::serialize(&transaction)
        .map_err(|e| BuildError::Serialize(e.to_string()))?
        .len();
    if size > PACKET_DATA_SIZE {
        return Err(BuildError::TooLarge {
            size,
            limit: PACKET_DATA_SIZE,
        });
    }

    Ok(transaction)
}

/// Build a single-instruction SOL transfer transaction (tips, funding moves).
pub fn build_transfer(
    from: &Keypair,
    to: &Pubkey,
    lamports: u64,
    blockhash: Hash,
) -> Result<VersionedTransaction, BuildError> {
    let from_pubkey = solana_sdk::signer::Signer::pubkey(from);
    let ix = system_instruction::transfer(&from_pubkey, to, lamports);
    build_transaction(from, &[ix], &[], blockhash)
}

/// Serialize a signed transaction to base64 for JSON-RPC submission.
pub fn to_base64(transaction: &VersionedTransaction) -> Result<String, BuildError> {
    use base64::Engine;
    let bytes =
        bincode::serialize(transaction).map_err(|e| BuildError::Serialize(e.to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_compute_budget_pair() {
        let ixs = compute_budget_instructions(100_000, 200_000);
        assert_eq!(ixs.len(), 2);
        for ix in &ixs {
            assert_eq!(ix.program_id, solana_sdk::compute_budget::id());
        }
    }

    #[test]
    fn test_transfer_builds_and_verifies() {
        let from = Keypair::new();
        let to = Pubkey::new_unique();
        let tx = build_transfer(&from, &to, 1_000_000, Hash::default()).unwrap();

        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.message.static_account_keys()[0], from.pubkey());
        assert!(tx.verify_with_results().iter().all(|ok| *ok));
    }

    #[test]
    fn test_multi_signer_transaction() {
        let payer = Keypair::new();
        let second = Keypair::new();
        let ix_a =
            system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1_000);
        let ix_b =
            system_instruction::transfer(&second.pubkey(), &Pubkey::new_unique(), 2_000);

        let tx =
            build_transaction(&payer, &[ix_a, ix_b], &[&second], Hash::default()).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert!(tx.verify_with_results().iter().all(|ok| *ok));
    }

    #[test]
    fn test_base64_round_trip() {
        use base64::Engine;
        let from = Keypair::new();
        let tx = build_transfer(&from, &Pubkey::new_unique(), 1, Hash::default()).unwrap();
        let encoded = to_base64(&tx).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&encoded)
            .unwrap();
        let decoded: VersionedTransaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.signatures, tx.signatures);
    }

    #[test]
    fn test_oversize_rejected() {
        let payer = Keypair::new();
        // Enough transfer instructions to blow past the packet limit.
        let ixs: Vec<Instruction> = (0..64)
            .map(|i| system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), i))
            .collect();
        let err = build_transaction(&payer, &ixs, &[], Hash::default()).unwrap_err();
        assert!(matches!(err, BuildError::TooLarge { .. }));
    }
}
