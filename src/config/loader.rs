//! Configuration Loading
//!
//! JSON config file shared by every strategy driver, plus the optional
//! per-wallet buy amount overrides. Operators hand-edit these files, so
//! numeric fields accept both bare numbers and quoted strings; quoted
//! values are coerced to int or float by the presence of a decimal point.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::sizing::sol_to_lamports;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("bad tip payer secret key: {0}")]
    BadTipKey(String),
}

/// Bot configuration, one JSON object.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// HTTP RPC endpoint.
    pub rpc: String,
    /// Websocket endpoint; kept for parity with the config format, unused
    /// by the drivers here.
    #[serde(default)]
    pub ws: Option<String>,
    /// Lower bound for randomized buy amounts, in SOL.
    #[serde(rename = "minBuy", deserialize_with = "lenient_f64")]
    pub min_buy: f64,
    /// Upper bound for randomized buy amounts, in SOL.
    #[serde(rename = "maxBuy", deserialize_with = "lenient_f64")]
    pub max_buy: f64,
    /// Fixed buy amount for micro mode, in SOL.
    #[serde(rename = "microBuyAmount", deserialize_with = "lenient_f64")]
    pub micro_buy_amount: f64,
    /// Compute unit price in micro-lamports.
    #[serde(rename = "computeUnit", deserialize_with = "lenient_u64")]
    pub compute_unit: u64,
    /// Compute unit limit.
    #[serde(rename = "computeLimit", deserialize_with = "lenient_u32")]
    pub compute_limit: u32,
    /// Primary block engine URL.
    #[serde(rename = "blockEngineUrl")]
    pub block_engine_url: String,
    /// Base58 secret key of the tip-paying wallet.
    #[serde(rename = "jitoTipPK")]
    pub jito_tip_secret: String,
    /// Tip per bundle, in SOL.
    #[serde(rename = "jitoTipAmount", deserialize_with = "lenient_f64")]
    pub jito_tip_amount: f64,
    /// Funding wallet secret key (base58), used by fund and cleanup.
    pub sender: String,
    /// Collection wallet address; default destination for refunded SOL and
    /// transferred tokens.
    #[serde(rename = "devWallet")]
    pub dev_wallet: String,
    /// Base inter-action delay, in seconds.
    #[serde(deserialize_with = "lenient_f64")]
    pub delay: f64,
    /// Buy slippage fraction (e.g. 0.15 for 15%).
    #[serde(deserialize_with = "lenient_f64")]
    pub slippage: f64,
    /// Submit through the block engine; when false, drivers send directly.
    #[serde(rename = "useJITO")]
    pub use_jito: bool,
}

impl BotConfig {
    /// Load and validate a config file. `~` in the path is expanded.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let expanded = shellexpand::tilde(path).into_owned();
        let raw = fs::read_to_string(&expanded).map_err(|source| ConfigError::Io {
            path: expanded.clone(),
            source,
        })?;
        let config: BotConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_buy <= 0.0 || self.max_buy <= 0.0 {
            return Err(ConfigError::Invalid("buy amounts must be positive".into()));
        }
        if self.min_buy > self.max_buy {
            return Err(ConfigError::Invalid(format!(
                "minBuy {} exceeds maxBuy {}",
                self.min_buy, self.max_buy
            )));
        }
        if !(0.0..1.0).contains(&self.slippage) {
            return Err(ConfigError::Invalid(format!(
                "slippage {} outside [0, 1)",
                self.slippage
            )));
        }
        if self.jito_tip_amount < 0.0 {
            return Err(ConfigError::Invalid("jitoTipAmount is negative".into()));
        }
        Ok(())
    }

    pub fn tip_lamports(&self) -> u64 {
        sol_to_lamports(self.jito_tip_amount)
    }

    /// Decode the tip payer keypair from its base58 secret.
    pub fn tip_payer(&self) -> Result<Keypair, ConfigError> {
        keypair_from_base58(&self.jito_tip_secret)
    }

    /// Decode the funding wallet keypair.
    pub fn sender(&self) -> Result<Keypair, ConfigError> {
        keypair_from_base58(&self.sender)
    }

    /// Parse the collection wallet address.
    pub fn dev_wallet_pubkey(&self) -> Result<Pubkey, ConfigError> {
        Pubkey::from_str(self.dev_wallet.trim())
            .map_err(|e| ConfigError::Invalid(format!("devWallet: {e}")))
    }
}

fn keypair_from_base58(secret: &str) -> Result<Keypair, ConfigError> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| ConfigError::BadTipKey(e.to_string()))?;
    Keypair::try_from(&bytes[..]).map_err(|e| ConfigError::BadTipKey(e.to_string()))
}

/// Per-wallet buy amount overrides, keyed `wallet1`, `wallet2`, ... in
/// wallet-file order. Wallets without an entry fall back to a randomized
/// amount in the configured range.
#[derive(Debug, Clone, Default)]
pub struct AmountOverrides {
    amounts: HashMap<String, f64>,
}

impl AmountOverrides {
    /// Load overrides; a missing file means no overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let amounts: HashMap<String, f64> = serde_json::from_str(&raw)?;
        Ok(Self { amounts })
    }

    /// Override for the wallet at `index` (zero-based) in the wallet file.
    pub fn amount_for(&self, index: usize) -> Option<f64> {
        self.amounts.get(&format!("wallet{}", index + 1)).copied()
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    struct Visitor;
    impl de::Visitor<'_> for Visitor {
        type Value = f64;
        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or numeric string")
        }
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }
        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim().parse().map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let v = lenient_f64(deserializer)?;
    if v < 0.0 || v.fract() != 0.0 {
        return Err(de::Error::custom(format!("expected an integer, got {v}")));
    }
    Ok(v as u64)
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let v = lenient_u64(deserializer)?;
    u32::try_from(v).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> String {
        r#"{
            "rpc": "https://example.com",
            "ws": "wss://example.com",
            "minBuy": "0.1",
            "maxBuy": "0.5",
            "microBuyAmount": "0.01",
            "computeUnit": "100000",
            "computeLimit": "200000",
            "blockEngineUrl": "https://ny.mainnet.block-engine.jito.wtf",
            "jitoTipPK": "somekey",
            "jitoTipAmount": 0.001,
            "sender": "somekey",
            "devWallet": "7rhxnLV8C77o6d8oz26AgK8x8m5ePsdeRawjqvojbjnQ",
            "delay": "2.5",
            "slippage": 0.15,
            "useJITO": true
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_with_string_coercion() {
        let config: BotConfig = serde_json::from_str(&sample_json()).unwrap();
        assert_eq!(config.min_buy, 0.1);
        assert_eq!(config.max_buy, 0.5);
        assert_eq!(config.compute_unit, 100_000);
        assert_eq!(config.compute_limit, 200_000);
        assert_eq!(config.delay, 2.5);
        assert!(config.use_jito);
        assert_eq!(config.tip_lamports(), 1_000_000);
    }

    #[test]
    fn test_dev_wallet_parses_as_pubkey() {
        let config: BotConfig = serde_json::from_str(&sample_json()).unwrap();
        let parsed = config.dev_wallet_pubkey().unwrap();
        assert_eq!(parsed.to_string(), config.dev_wallet);

        let mut bad = config;
        bad.dev_wallet = "not-an-address".into();
        assert!(matches!(
            bad.dev_wallet_pubkey(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();
        let config = BotConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.rpc, "https://example.com");
    }

    #[test]
    fn test_min_above_max_rejected() {
        let raw = sample_json().replace("\"0.1\"", "\"0.9\"");
        let config: BotConfig = serde_json::from_str(&raw).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_fractional_integer_rejected() {
        let raw = sample_json().replace("\"100000\"", "\"1.5\"");
        let err = serde_json::from_str::<BotConfig>(&raw).unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_overrides_missing_file_is_empty() {
        let overrides = AmountOverrides::load(Path::new("/nonexistent/buyAmounts.json")).unwrap();
        assert_eq!(overrides.amount_for(0), None);
    }

    #[test]
    fn test_overrides_lookup_is_one_based() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "wallet1": 0.25, "wallet3": 0.5 }"#).unwrap();
        let overrides = AmountOverrides::load(file.path()).unwrap();
        assert_eq!(overrides.amount_for(0), Some(0.25));
        assert_eq!(overrides.amount_for(1), None);
        assert_eq!(overrides.amount_for(2), Some(0.5));
    }
}
