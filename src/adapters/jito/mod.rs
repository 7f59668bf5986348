//! Jito block engine adapter: bundle assembly, submission, and confirmation.

pub mod bundle;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use bundle::{assemble_bundle, build_tip_transaction, chunk_swaps, MAX_SWAPS_PER_BUNDLE};
pub use client::{JitoClient, MAX_BUNDLE_TRANSACTIONS};
pub use config::JitoConfig;
pub use error::JitoError;
pub use types::BundleOutcome;
