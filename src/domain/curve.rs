//! Bonding Curve Pricing
//!
//! Local mirror of the pump.fun constant-product bonding curve. Quotes here
//! must agree byte-for-byte with what the on-chain program computes, otherwise
//! the encoded token amount will revert against `max_sol_cost` at execution.

/// Fee charged by the venue, in basis points. The on-chain global config holds
/// the authoritative value; 100 (1%) is what the program has used since launch.
pub const DEFAULT_FEE_BASIS_POINTS: u64 = 100;

/// Snapshot of a bonding curve's reserve state.
///
/// The driver owns one copy per run: it is fetched from chain at session start
/// and then advanced locally via [`CurveState::apply_buy`] so that successive
/// quotes within one run reflect the price impact of earlier buys without a
/// round-trip per trade. Staleness against other traders is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveState {
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub token_total_supply: u64,
    pub fee_basis_points: u64,
}

impl CurveState {
    /// Tokens received for `sol_in` lamports under the constant-product rule.
    ///
    /// Mirrors the program exactly:
    /// `floor(vsol * vtok / (vsol + in)) + 1` subtracted from the virtual
    /// token reserves, clamped to the real (non-virtual) token reserves so the
    /// quote never promises more than actual liquidity.
    pub fn quote_buy(&self, sol_in: u64) -> u64 {
        if sol_in == 0 {
            return 0;
        }

        let product = self.virtual_sol_reserves as u128 * self.virtual_token_reserves as u128;
        let new_sol_reserves = self.virtual_sol_reserves as u128 + sol_in as u128;
        let new_token_amount = product / new_sol_reserves + 1;

        let raw = (self.virtual_token_reserves as u128).saturating_sub(new_token_amount);
        (raw as u64).min(self.real_token_reserves)
    }

    /// Protocol fee on a buy of `sol_in` lamports.
    ///
    /// The fee is assessed on-chain and is NOT deducted from the quoted token
    /// output; locally it only discounts the tracked SOL reserve growth in
    /// [`CurveState::apply_buy`].
    pub fn fee(&self, sol_in: u64) -> u64 {
        ((sol_in as u128 * self.fee_basis_points as u128) / 10_000) as u64
    }

    /// Quote a buy and advance the local reserve snapshot past it.
    ///
    /// Returns the token output. Virtual reserves move the way the program
    /// moves them; real reserves are only refreshed from chain.
    pub fn apply_buy(&mut self, sol_in: u64) -> u64 {
        let out = self.quote_buy(sol_in);
        if out == 0 {
            return 0;
        }

        let fee = self.fee(sol_in);
        self.virtual_sol_reserves = self
            .virtual_sol_reserves
            .saturating_add(sol_in)
            .saturating_sub(fee);
        self.virtual_token_reserves = self.virtual_token_reserves.saturating_sub(out);
        out
    }

    /// Spot price in lamports-per-token-unit terms, for display only.
    pub fn spot_price(&self) -> f64 {
        if self.virtual_token_reserves == 0 {
            return 0.0;
        }
        let sol = self.virtual_sol_reserves as f64 / 1e9;
        let tokens = self.virtual_token_reserves as f64 / 1e6;
        sol / tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_curve() -> CurveState {
        CurveState {
            virtual_token_reserves: 1_000_000_000_000_000,
            virtual_sol_reserves: 30_000_000_000,
            real_token_reserves: 800_000_000_000_000,
            real_sol_reserves: 0,
            token_total_supply: 1_000_000_000_000_000,
            fee_basis_points: DEFAULT_FEE_BASIS_POINTS,
        }
    }

    #[test]
    fn test_zero_input_zero_output() {
        let curve = fresh_curve();
        assert_eq!(curve.quote_buy(0), 0);
    }

    #[test]
    fn test_one_sol_quote_exact() {
        // product = 30e9 * 1e15; floor(product / 31e9) + 1 subtracted from
        // virtual token reserves, under the real-reserve clamp.
        let curve = fresh_curve();
        assert_eq!(curve.quote_buy(1_000_000_000), 32_258_064_516_129);
    }

    #[test]
    fn test_quote_bounded_by_reserves() {
        let curve = fresh_curve();
        for sol_in in [1u64, 1_000, 1_000_000_000, u64::MAX / 2] {
            let out = curve.quote_buy(sol_in);
            assert!(out < curve.virtual_token_reserves);
            assert!(out <= curve.real_token_reserves);
        }
    }

    #[test]
    fn test_huge_buy_clamped_to_real_reserves() {
        let curve = fresh_curve();
        // Buying far more than the pool holds returns everything real, no more.
        let out = curve.quote_buy(10_000_000_000_000);
        assert_eq!(out, curve.real_token_reserves);
    }

    #[test]
    fn test_price_impact_accumulates() {
        let mut curve = fresh_curve();
        let sol_in = 500_000_000;

        let mut last = u64::MAX;
        for _ in 0..10 {
            let out = curve.apply_buy(sol_in);
            assert!(out <= last, "repeated quotes must be non-increasing");
            last = out;
        }
    }

    #[test]
    fn test_fee_is_one_percent_at_default_bps() {
        let curve = fresh_curve();
        assert_eq!(curve.fee(1_000_000_000), 10_000_000);
        assert_eq!(curve.fee(0), 0);
    }

    #[test]
    fn test_apply_buy_moves_virtual_reserves() {
        let mut curve = fresh_curve();
        let sol_in = 1_000_000_000;
        let out = curve.apply_buy(sol_in);

        assert_eq!(out, 32_258_064_516_129);
        // SOL reserves grow by input minus fee; token reserves shrink by output.
        assert_eq!(curve.virtual_sol_reserves, 30_000_000_000 + sol_in - 10_000_000);
        assert_eq!(
            curve.virtual_token_reserves,
            1_000_000_000_000_000 - 32_258_064_516_129
        );
    }

    #[test]
    fn test_fee_not_deducted_from_output() {
        // The quoted token amount is gross; the venue takes its cut in SOL
        // on-chain. A curve with zero fee bps must quote identically.
        let curve = fresh_curve();
        let mut no_fee = curve;
        no_fee.fee_basis_points = 0;
        assert_eq!(curve.quote_buy(1_000_000_000), no_fee.quote_buy(1_000_000_000));
    }
}
