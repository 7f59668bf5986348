//! Configuration loading and validation.

pub mod loader;

pub use loader::{AmountOverrides, BotConfig, ConfigError};
