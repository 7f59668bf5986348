//! Jito Configuration
//!
//! Block engine endpoints, tip accounts, and submission tuning.

use std::time::Duration;

use rand::Rng;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Jito Block Engine endpoints
pub mod endpoints {
    /// Mainnet block engine (Amsterdam)
    pub const MAINNET_AMSTERDAM: &str = "https://amsterdam.mainnet.block-engine.jito.wtf";
    /// Mainnet block engine (Frankfurt)
    pub const MAINNET_FRANKFURT: &str = "https://frankfurt.mainnet.block-engine.jito.wtf";
    /// Mainnet block engine (New York)
    pub const MAINNET_NY: &str = "https://ny.mainnet.block-engine.jito.wtf";
    /// Mainnet block engine (Tokyo)
    pub const MAINNET_TOKYO: &str = "https://tokyo.mainnet.block-engine.jito.wtf";
    /// Default mainnet endpoint
    pub const MAINNET_DEFAULT: &str = MAINNET_NY;

    /// Every mainnet block engine, for redundant submission.
    pub const ALL: &[&str] = &[
        MAINNET_AMSTERDAM,
        MAINNET_FRANKFURT,
        MAINNET_NY,
        MAINNET_TOKYO,
    ];
}

/// Official Jito tip accounts (validators rotate through these).
pub const TIP_ACCOUNTS: &[&str] = &[
    "96gYZGLnJYVFmbjzopPSU6QiEV5fGqZNyN9nmNhvrZU5",
    "HFqU5x63VTqvQss8hp11i4wVV8bD44PvwucfZ2bU7gRe",
    "Cw8CFyM9FkoMi7K7Crf6HNQqf4uEMzpKw6QNghXLvLkY",
    "ADaUMid9yfUytqMBgopwjb2DTLSokTSzL1zt6iGPaS49",
    "DfXygSm4jCyNCybVYYK6DwvWqjKee8pbDmJGcLWNDXjh",
    "ADuUkR4vqLUMWXxW9gh6D6L8pMSawimctcNZ5pGwDcEt",
    "DttWaMuVvTiduZRnguLF7jNxTgiMBZ1hyAumKUiL2KRL",
    "3AVi9Tg9Uo68tJfuvoKvqKNWKkC5wPdSSdeBnizKZ6jT",
];

/// Pick a tip account uniformly at random. Spreading tips across the set
/// avoids write-lock contention between concurrent bundles.
pub fn pick_tip_account<R: Rng>(rng: &mut R) -> Pubkey {
    let idx = rng.gen_range(0..TIP_ACCOUNTS.len());
    Pubkey::from_str(TIP_ACCOUNTS[idx]).expect("static pubkey")
}

/// Jito Block Engine configuration
#[derive(Debug, Clone)]
pub struct JitoConfig {
    /// Primary block engine endpoint; the rest of [`endpoints::ALL`] get a
    /// fire-and-forget copy of every bundle.
    pub block_engine_url: String,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Tip amount in lamports per bundle
    pub tip_lamports: u64,
    /// Interval between inflight status polls
    pub poll_interval: Duration,
    /// Total time to wait for a bundle before calling it indeterminate
    pub confirm_timeout: Duration,
}

impl Default for JitoConfig {
    fn default() -> Self {
        Self {
            block_engine_url: endpoints::MAINNET_DEFAULT.to_string(),
            timeout: Duration::from_secs(10),
            tip_lamports: 1_000_000,
            poll_interval: Duration::from_millis(2_500),
            confirm_timeout: Duration::from_secs(40),
        }
    }
}

impl JitoConfig {
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.block_engine_url = url.into();
        self
    }

    pub fn with_tip_lamports(mut self, lamports: u64) -> Self {
        self.tip_lamports = lamports;
        self
    }

    /// Endpoints other than the primary.
    pub fn secondary_endpoints(&self) -> Vec<&'static str> {
        endpoints::ALL
            .iter()
            .copied()
            .filter(|url| *url != self.block_engine_url)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_tip_accounts_parse() {
        for s in TIP_ACCOUNTS {
            Pubkey::from_str(s).unwrap();
        }
        assert_eq!(TIP_ACCOUNTS.len(), 8);
    }

    #[test]
    fn test_tip_selection_covers_all_accounts() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn: HashSet<Pubkey> = (0..1000).map(|_| pick_tip_account(&mut rng)).collect();
        assert_eq!(drawn.len(), TIP_ACCOUNTS.len());
    }

    #[test]
    fn test_secondary_endpoints_exclude_primary() {
        let config = JitoConfig::default();
        let secondary = config.secondary_endpoints();
        assert_eq!(secondary.len(), endpoints::ALL.len() - 1);
        assert!(!secondary.contains(&config.block_engine_url.as_str()));
    }
}
