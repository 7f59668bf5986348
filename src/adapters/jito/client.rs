//! Jito Bundle Client
//!
//! HTTP client for the Block Engine JSON-RPC API. Submits bundles to the
//! primary endpoint, mirrors them to the other regions, and polls inflight
//! status until the bundle resolves or the confirmation window closes.

use std::time::Instant;

use reqwest::Client;
use solana_sdk::transaction::VersionedTransaction;
use tracing::{debug, warn};

use super::config::JitoConfig;
use super::error::JitoError;
use super::types::{
    is_already_processed, BundleOutcome, BundleRequest, InflightStatusesResult, JsonRpcResponse,
};
use crate::adapters::solana::tx_builder;

/// Maximum transactions per bundle, fixed by the block engine.
pub const MAX_BUNDLE_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct JitoClient {
    config: JitoConfig,
    http: Client,
}

impl JitoClient {
    pub fn new(config: JitoConfig) -> Result<Self, JitoError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &JitoConfig {
        &self.config
    }

    /// Submit a bundle to the primary block engine and mirror it to every
    /// other region.
    ///
    /// The mirrored submissions are fire-and-forget: the same bundle lands
    /// at most once, so only the primary response is tracked. Returns the
    /// bundle ID for status polling.
    pub async fn send_bundle(
        &self,
        transactions: &[VersionedTransaction],
    ) -> Result<String, JitoError> {
        if transactions.is_empty() {
            return Err(JitoError::InvalidBundle("bundle cannot be empty".into()));
        }
        if transactions.len() > MAX_BUNDLE_TRANSACTIONS {
            return Err(JitoError::InvalidBundle(format!(
                "bundle has {} transactions (limit {})",
                transactions.len(),
                MAX_BUNDLE_TRANSACTIONS
            )));
        }

        let encoded: Vec<String> = transactions
            .iter()
            .map(|tx| tx_builder::to_base64(tx).map_err(|e| JitoError::Encode(e.to_string())))
            .collect::<Result<_, _>>()?;

        let request = BundleRequest::send_bundle(encoded);
        let bundle_id = self
            .post_bundle_request(&self.config.block_engine_url, &request)
            .await?;
        debug!(bundle_id = %bundle_id, "bundle accepted by primary block engine");

        self.mirror_to_secondaries(request);

        Ok(bundle_id)
    }

    /// Poll until the bundle resolves, the rejection proves the trade already
    /// executed, or the confirmation window closes.
    pub async fn await_outcome(&self, bundle_id: &str) -> Result<BundleOutcome, JitoError> {
        let start = Instant::now();

        while start.elapsed() < self.config.confirm_timeout {
            match self.inflight_status(bundle_id).await {
                Ok(Some(outcome)) => return Ok(outcome),
                Ok(None) => {}
                // Polling hiccups are not bundle failures; keep waiting.
                Err(e) if e.is_retryable() => {
                    warn!(bundle_id, error = %e, "status poll failed, retrying");
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        Ok(BundleOutcome::Indeterminate)
    }

    /// Submit and wait for resolution in one call.
    ///
    /// A submission rejected because its transactions already landed through
    /// another relay resolves as [`BundleOutcome::AlreadyProcessed`] rather
    /// than an error.
    pub async fn submit_and_confirm(
        &self,
        transactions: &[VersionedTransaction],
    ) -> Result<BundleOutcome, JitoError> {
        match self.send_bundle(transactions).await {
            Ok(bundle_id) => self.await_outcome(&bundle_id).await,
            Err(JitoError::Api { message, .. }) if is_already_processed(&message) => {
                Ok(BundleOutcome::AlreadyProcessed)
            }
            Err(e) => Err(e),
        }
    }

    async fn inflight_status(&self, bundle_id: &str) -> Result<Option<BundleOutcome>, JitoError> {
        let request = BundleRequest::inflight_statuses(vec![bundle_id.to_string()]);
        let url = bundles_url(&self.config.block_engine_url);

        let response = self.http.post(&url).json(&request).send().await?;
        if response.status().as_u16() == 429 {
            return Err(JitoError::RateLimited);
        }

        let body = response.text().await?;
        let parsed: JsonRpcResponse<InflightStatusesResult> = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            if is_already_processed(&error.message) {
                return Ok(Some(BundleOutcome::AlreadyProcessed));
            }
            return Err(JitoError::Api {
                code: error.code,
                message: error.message,
            });
        }

        let status = parsed
            .result
            .and_then(|r| r.value.into_iter().find(|s| s.bundle_id == bundle_id));

        Ok(match status {
            Some(s) => match s.status.as_str() {
                "Landed" => Some(BundleOutcome::Landed {
                    slot: s.landed_slot.unwrap_or_default(),
                }),
                "Failed" => Some(BundleOutcome::Rejected {
                    reason: "bundle failed without landing".into(),
                }),
                // Pending, or Invalid (not yet seen by the engine).
                _ => None,
            },
            None => None,
        })
    }

    /// Post the bundle to every non-primary block engine without awaiting
    /// the responses.
    fn mirror_to_secondaries(&self, request: BundleRequest) {
        for endpoint in self.config.secondary_endpoints() {
            let http = self.http.clone();
            let request = request.clone();
            let url = bundles_url(endpoint);
            tokio::spawn(async move {
                if let Err(e) = http.post(&url).json(&request).send().await {
                    debug!(url, error = %e, "secondary bundle submission failed");
                }
            });
        }
    }

    async fn post_bundle_request(
        &self,
        endpoint: &str,
        request: &BundleRequest,
    ) -> Result<String, JitoError> {
        let url = bundles_url(endpoint);
        let response = self.http.post(&url).json(request).send().await?;

        if response.status().as_u16() == 429 {
            return Err(JitoError::RateLimited);
        }

        let body = response.text().await?;
        let parsed: JsonRpcResponse<String> = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(JitoError::Api {
                code: error.code,
                message: error.message,
            });
        }

        parsed.result.ok_or(JitoError::Api {
            code: -1,
            message: "no bundle ID in response".into(),
        })
    }
}

fn bundles_url(endpoint: &str) -> String {
    format!("{}/api/v1/bundles", endpoint)
}
