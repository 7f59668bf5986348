//! Solana RPC Adapter
//!
//! Async-compatible wrapper around the blocking RPC client. Every network
//! call is pushed onto the blocking pool so driver loops stay cooperative.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC request failed: {0}")]
    Request(String),
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),
    #[error("transaction send failed: {0}")]
    SendFailed(String),
    #[error("transaction simulation failed: {0}")]
    SimulationFailed(String),
}

/// Shared RPC handle; cheap to clone across drivers.
#[derive(Clone)]
pub struct SolanaRpc {
    client: Arc<RpcClient>,
}

impl SolanaRpc {
    pub fn new(rpc_url: String) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(
            rpc_url,
            CommitmentConfig::confirmed(),
        ));
        Self { client }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, RpcError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<RpcClient>) -> Result<T, RpcError> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || op(client))
            .await
            .map_err(|e| RpcError::Request(format!("task join error: {}", e)))?
    }

    /// SOL balance in lamports.
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        let pubkey = *pubkey;
        self.blocking(move |client| {
            client
                .get_balance(&pubkey)
                .map_err(|e| RpcError::Request(e.to_string()))
        })
        .await
    }

    /// Raw account data, distinguishing a missing account from RPC failure.
    pub async fn get_account_data(&self, pubkey: &Pubkey) -> Result<Vec<u8>, RpcError> {
        let pubkey = *pubkey;
        self.blocking(move |client| {
            let response = client
                .get_account_with_commitment(&pubkey, CommitmentConfig::confirmed())
                .map_err(|e| RpcError::Request(e.to_string()))?;
            match response.value {
                Some(account) => Ok(account.data),
                None => Err(RpcError::AccountNotFound(pubkey)),
            }
        })
        .await
    }

    /// First token account holding `mint` for `owner`, if any.
    pub async fn find_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Option<Pubkey>, RpcError> {
        let (owner, mint) = (*owner, *mint);
        self.blocking(move |client| {
            let accounts = client
                .get_token_accounts_by_owner(&owner, TokenAccountsFilter::Mint(mint))
                .map_err(|e| RpcError::Request(e.to_string()))?;
            match accounts.first() {
                Some(keyed) => {
                    let pubkey = Pubkey::from_str(&keyed.pubkey)
                        .map_err(|e| RpcError::Request(e.to_string()))?;
                    Ok(Some(pubkey))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Raw token balance of an SPL token account.
    pub async fn get_token_balance(&self, token_account: &Pubkey) -> Result<u64, RpcError> {
        let token_account = *token_account;
        self.blocking(move |client| {
            let balance = client
                .get_token_account_balance(&token_account)
                .map_err(|e| RpcError::Request(e.to_string()))?;
            balance
                .amount
                .parse::<u64>()
                .map_err(|e| RpcError::Request(format!("balance parse error: {}", e)))
        })
        .await
    }

    /// Fresh blockhash; must be fetched immediately before signing or the
    /// network rejects the transaction as expired.
    pub async fn latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.blocking(move |client| {
            client
                .get_latest_blockhash()
                .map_err(|e| RpcError::Request(e.to_string()))
        })
        .await
    }

    /// Simulate a signed transaction against current network state.
    ///
    /// Ok(()) means the transaction would execute; a program error comes back
    /// as [`RpcError::SimulationFailed`] with the logs folded in.
    pub async fn simulate(&self, transaction: &VersionedTransaction) -> Result<(), RpcError> {
        let tx = transaction.clone();
        self.blocking(move |client| {
            let result = client
                .simulate_transaction(&tx)
                .map_err(|e| RpcError::Request(e.to_string()))?;
            if let Some(err) = result.value.err {
                let logs = result.value.logs.unwrap_or_default().join("\n");
                return Err(RpcError::SimulationFailed(format!("{err}\n{logs}")));
            }
            Ok(())
        })
        .await
    }

    /// Fire a signed transaction, skipping preflight (the drivers simulate
    /// themselves where it matters).
    pub async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        max_retries: usize,
    ) -> Result<Signature, RpcError> {
        let tx = transaction.clone();
        self.blocking(move |client| {
            client
                .send_transaction_with_config(
                    &tx,
                    RpcSendTransactionConfig {
                        skip_preflight: true,
                        max_retries: Some(max_retries),
                        ..RpcSendTransactionConfig::default()
                    },
                )
                .map_err(|e| RpcError::SendFailed(e.to_string()))
        })
        .await
    }

    /// Poll a signature for confirmation, up to `timeout`.
    ///
    /// Returns false on timeout; a confirmed-but-failed transaction is an
    /// error.
    pub async fn confirm_signature(
        &self,
        signature: &Signature,
        timeout: Duration,
    ) -> Result<bool, RpcError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            let signature = *signature;
            let confirmed = self
                .blocking(move |client| {
                    client
                        .confirm_transaction(&signature)
                        .map_err(|e| RpcError::Request(e.to_string()))
                })
                .await?;
            if confirmed {
                return Ok(true);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let rpc = SolanaRpc::new("https://api.devnet.solana.com".to_string());
        let _clone = rpc.clone();
    }

    #[test]
    fn test_error_display() {
        let err = RpcError::SimulationFailed("custom program error".into());
        assert!(err.to_string().contains("simulation failed"));

        let pk = Pubkey::new_unique();
        let err = RpcError::AccountNotFound(pk);
        assert!(err.to_string().contains(&pk.to_string()));
    }
}
