//! Trade Sizing
//!
//! Soft-degrade policy shared by every strategy driver: an intended buy that
//! exceeds the wallet's balance is shrunk instead of failed, and buys too
//! small to register on the venue's trade feed are skipped.

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Smallest downsized buy worth sending; below this the trade won't show on
/// the feed. Configured amounts are taken as-is when they fit.
pub const MIN_VISIBLE_BUY_LAMPORTS: u64 = 10_000_000; // 0.01 SOL

/// Fraction of balance used when the configured amount doesn't fit.
const DOWNSIZE_NUMERATOR: u64 = 75;
const DOWNSIZE_DENOMINATOR: u64 = 100;

/// Outcome of sizing a buy against the wallet's live balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizedBuy {
    /// Configured amount fits as-is.
    Full(u64),
    /// Configured amount exceeded balance; shrunk to 75% of balance.
    Downsized(u64),
    /// Balance too low for a useful trade; skip this wallet this round.
    Skip,
}

impl SizedBuy {
    pub fn lamports(&self) -> Option<u64> {
        match self {
            SizedBuy::Full(v) | SizedBuy::Downsized(v) => Some(*v),
            SizedBuy::Skip => None,
        }
    }
}

/// Size an intended buy against the wallet's current lamport balance.
///
/// An intended amount that fits goes through unchanged, however small; the
/// visibility floor only gates amounts that had to be shrunk to balance.
pub fn size_buy(balance_lamports: u64, intended_lamports: u64) -> SizedBuy {
    if intended_lamports == 0 {
        return SizedBuy::Skip;
    }

    if intended_lamports < balance_lamports {
        return SizedBuy::Full(intended_lamports);
    }

    let shrunk = balance_lamports / DOWNSIZE_DENOMINATOR * DOWNSIZE_NUMERATOR;
    if shrunk < MIN_VISIBLE_BUY_LAMPORTS {
        SizedBuy::Skip
    } else {
        SizedBuy::Downsized(shrunk)
    }
}

/// Convert a SOL amount (config values are SOL-denominated) to lamports.
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_amount_fits() {
        assert_eq!(
            size_buy(2_000_000_000, 1_000_000_000),
            SizedBuy::Full(1_000_000_000)
        );
    }

    #[test]
    fn test_downsize_to_three_quarters_of_balance() {
        // 0.5 SOL balance, 1 SOL configured -> 0.375 SOL buy.
        assert_eq!(
            size_buy(500_000_000, 1_000_000_000),
            SizedBuy::Downsized(375_000_000)
        );
    }

    #[test]
    fn test_skip_when_downsized_below_floor() {
        // 75% of these balances is under 0.01 SOL, not worth sending.
        assert_eq!(size_buy(9_999_999, 1_000_000_000), SizedBuy::Skip);
        assert_eq!(size_buy(0, 1_000_000_000), SizedBuy::Skip);
    }

    #[test]
    fn test_small_affordable_buy_goes_through() {
        // A 0.005 SOL micro buy from a 0.009 SOL wallet fits; the floor only
        // applies to amounts shrunk against balance.
        assert_eq!(size_buy(9_000_000, 5_000_000), SizedBuy::Full(5_000_000));
    }

    #[test]
    fn test_skip_when_downsized_below_minimum() {
        // 0.012 SOL balance -> 75% = 0.009 SOL, under the visibility floor.
        assert_eq!(size_buy(12_000_000, 500_000_000), SizedBuy::Skip);
    }

    #[test]
    fn test_zero_intended_skips() {
        assert_eq!(size_buy(1_000_000_000, 0), SizedBuy::Skip);
    }

    #[test]
    fn test_sol_to_lamports() {
        assert_eq!(sol_to_lamports(1.0), 1_000_000_000);
        assert_eq!(sol_to_lamports(0.375), 375_000_000);
        assert_eq!(sol_to_lamports(0.0), 0);
    }
}
