//! Jito Bundle Types
//!
//! Request and response types for the Block Engine JSON-RPC API, and the
//! resolved outcome of a submitted bundle.

use serde::{Deserialize, Serialize};

/// Bundle submission request (JSON-RPC format)
#[derive(Debug, Clone, Serialize)]
pub struct BundleRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: serde_json::Value,
}

impl BundleRequest {
    /// `sendBundle` with base64-encoded transactions.
    pub fn send_bundle(transactions: Vec<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: 1,
            method: "sendBundle".to_string(),
            params: serde_json::json!([transactions, { "encoding": "base64" }]),
        }
    }

    /// `getInflightBundleStatuses` for a set of bundle IDs.
    pub fn inflight_statuses(bundle_ids: Vec<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: 1,
            method: "getInflightBundleStatuses".to_string(),
            params: serde_json::json!([bundle_ids]),
        }
    }
}

/// JSON-RPC response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Result body of `getInflightBundleStatuses`.
#[derive(Debug, Clone, Deserialize)]
pub struct InflightStatusesResult {
    pub value: Vec<InflightBundleStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InflightBundleStatus {
    pub bundle_id: String,
    /// `Invalid`, `Pending`, `Landed`, or `Failed`.
    pub status: String,
    pub landed_slot: Option<u64>,
}

/// Resolved fate of a submitted bundle.
///
/// `AlreadyProcessed` covers the block engine rejecting a bundle because its
/// transactions already landed through another relay; the trade succeeded
/// even though this submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// Bundle landed on chain.
    Landed { slot: u64 },
    /// Rejected as a duplicate of work that already executed.
    AlreadyProcessed,
    /// Definitively rejected; the trade did not happen through this bundle.
    Rejected { reason: String },
    /// No terminal status within the confirmation window. The bundle may
    /// still land; callers should check balances before retrying.
    Indeterminate,
}

impl BundleOutcome {
    /// True when the underlying trade executed (or was already executed).
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            BundleOutcome::Landed { .. } | BundleOutcome::AlreadyProcessed
        )
    }
}

/// Rejection messages that mean the transactions already executed. The block
/// engine words these a few different ways across rejection kinds.
pub fn is_already_processed(message: &str) -> bool {
    let msg = message.to_lowercase();
    msg.contains("partially") || msg.contains("been processed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_bundle_request_shape() {
        let req = BundleRequest::send_bundle(vec!["dGVzdA==".to_string()]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["method"], "sendBundle");
        assert_eq!(json["params"][0][0], "dGVzdA==");
        assert_eq!(json["params"][1]["encoding"], "base64");
    }

    #[test]
    fn test_inflight_status_deserializes() {
        let body = r#"{
            "result": {
                "context": { "slot": 280999028 },
                "value": [
                    { "bundle_id": "abc", "status": "Landed", "landed_slot": 280999028 }
                ]
            },
            "error": null
        }"#;
        let resp: JsonRpcResponse<InflightStatusesResult> = serde_json::from_str(body).unwrap();
        let value = &resp.result.unwrap().value[0];
        assert_eq!(value.status, "Landed");
        assert_eq!(value.landed_slot, Some(280999028));
    }

    #[test]
    fn test_already_processed_phrasing() {
        assert!(is_already_processed("bundle partially processed"));
        assert!(is_already_processed("transaction has already been processed"));
        assert!(is_already_processed("Bundle Partially Landed"));
        assert!(!is_already_processed("state auction bid rejected"));
    }

    #[test]
    fn test_outcome_success_classification() {
        assert!(BundleOutcome::Landed { slot: 1 }.is_success());
        assert!(BundleOutcome::AlreadyProcessed.is_success());
        assert!(!BundleOutcome::Rejected { reason: "x".into() }.is_success());
        assert!(!BundleOutcome::Indeterminate.is_success());
    }
}
