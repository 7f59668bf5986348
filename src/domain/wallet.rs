//! Wallet Store
//!
//! Flat-file wallet storage: one `base58Address:base58SecretKey` pair per
//! line. Wallets are immutable once loaded; identity is the public address.

use std::fmt;
use std::fs;
use std::path::Path;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletStoreError {
    #[error("failed to read wallet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed entry (expected address:secret)")]
    Malformed { line: usize },
    #[error("line {line}: invalid secret key: {reason}")]
    BadSecret { line: usize, reason: String },
    #[error("line {line}: address {found} does not match secret key (derives {derived})")]
    AddressMismatch {
        line: usize,
        found: String,
        derived: String,
    },
}

/// A trading wallet loaded from the flat store.
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Generate a fresh random wallet.
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Store-format line: `address:secret`, both base58.
    pub fn to_line(&self) -> String {
        format!(
            "{}:{}",
            self.keypair.pubkey(),
            bs58::encode(self.keypair.to_bytes()).into_string()
        )
    }
}

impl Clone for Wallet {
    fn clone(&self) -> Self {
        Self {
            // Keypair is not Clone; round-trip through bytes.
            keypair: Keypair::try_from(&self.keypair.to_bytes()[..])
                .expect("keypair bytes round-trip"),
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("pubkey", &self.keypair.pubkey())
            .finish_non_exhaustive()
    }
}

/// Load every wallet from a colon-delimited flat file.
///
/// Blank lines are skipped and all whitespace (including hidden characters
/// from copy-paste) is stripped before parsing. Each secret is verified to
/// derive the address written next to it.
pub fn load_wallets<P: AsRef<Path>>(path: P) -> Result<Vec<Wallet>, WalletStoreError> {
    let raw = fs::read_to_string(path)?;
    let mut wallets = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let clean: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if clean.is_empty() {
            continue;
        }

        let (address, secret) = clean
            .split_once(':')
            .ok_or(WalletStoreError::Malformed { line: line_no })?;
        if address.is_empty() || secret.is_empty() || secret.contains(':') {
            return Err(WalletStoreError::Malformed { line: line_no });
        }

        let bytes = bs58::decode(secret)
            .into_vec()
            .map_err(|e| WalletStoreError::BadSecret {
                line: line_no,
                reason: e.to_string(),
            })?;
        let keypair = Keypair::try_from(&bytes[..]).map_err(|e| WalletStoreError::BadSecret {
            line: line_no,
            reason: e.to_string(),
        })?;

        let derived = keypair.pubkey().to_string();
        if derived != address {
            return Err(WalletStoreError::AddressMismatch {
                line: line_no,
                found: address.to_string(),
                derived,
            });
        }

        wallets.push(Wallet::new(keypair));
    }

    Ok(wallets)
}

/// Generate `count` wallets and append them to the store file.
pub fn generate_wallets<P: AsRef<Path>>(
    path: P,
    count: usize,
) -> Result<Vec<Wallet>, WalletStoreError> {
    let wallets: Vec<Wallet> = (0..count).map(|_| Wallet::generate()).collect();

    let mut contents = fs::read_to_string(&path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for wallet in &wallets {
        contents.push_str(&wallet.to_line());
        contents.push('\n');
    }
    fs::write(&path, contents)?;

    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_round_trip_single_wallet() {
        let wallet = Wallet::generate();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", wallet.to_line()).unwrap();
        file.flush().unwrap();

        let loaded = load_wallets(file.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].pubkey(), wallet.pubkey());
    }

    #[test]
    fn test_whitespace_and_blank_lines_ignored() {
        let w1 = Wallet::generate();
        let w2 = Wallet::generate();
        let mut file = NamedTempFile::new().unwrap();
        // Hidden whitespace inside a line and blank lines between entries.
        let dirty = w1.to_line().replace(':', " : ");
        writeln!(file, "  {}  \n\n\r\n{}\n", dirty, w2.to_line()).unwrap();
        file.flush().unwrap();

        let loaded = load_wallets(file.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].pubkey(), w1.pubkey());
        assert_eq!(loaded[1].pubkey(), w2.pubkey());
    }

    #[test]
    fn test_malformed_line_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not-a-wallet-line").unwrap();
        file.flush().unwrap();

        let err = load_wallets(file.path()).unwrap_err();
        assert!(matches!(err, WalletStoreError::Malformed { line: 1 }));
    }

    #[test]
    fn test_mismatched_address_rejected() {
        let w1 = Wallet::generate();
        let w2 = Wallet::generate();
        let mut file = NamedTempFile::new().unwrap();
        // w2's address paired with w1's secret.
        writeln!(
            file,
            "{}:{}",
            w2.pubkey(),
            bs58::encode(w1.keypair().to_bytes()).into_string()
        )
        .unwrap();
        file.flush().unwrap();

        let err = load_wallets(file.path()).unwrap_err();
        assert!(matches!(err, WalletStoreError::AddressMismatch { .. }));
    }

    #[test]
    fn test_generate_appends_to_existing_store() {
        let file = NamedTempFile::new().unwrap();
        let first = generate_wallets(file.path(), 2).unwrap();
        let second = generate_wallets(file.path(), 3).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);

        let loaded = load_wallets(file.path()).unwrap();
        assert_eq!(loaded.len(), 5);
        assert_eq!(loaded[0].pubkey(), first[0].pubkey());
        assert_eq!(loaded[4].pubkey(), second[2].pubkey());
    }

    #[test]
    fn test_wallet_clone_preserves_identity() {
        let wallet = Wallet::generate();
        let clone = wallet.clone();
        assert_eq!(wallet.pubkey(), clone.pubkey());
    }
}
