//! HTTP ledger client
//!
//! Talks to a ledger node over its REST surface. Calls are single-attempt:
//! the ledger network provides its own submission semantics, so failures
//! are reported to the caller instead of being retried here.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use freshtrace_core::{
    derive_record_address, LedgerError, LedgerResult, ProductRecord, TransactionReceipt,
    TransactionSigner,
};

use crate::client::ProvenanceLedger;
use crate::tx::{LedgerInstruction, SignedTransaction};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP-based provenance ledger client
///
/// Connects to a ledger node for remote deployments.
pub struct HttpLedgerClient {
    /// Base URL of the ledger node
    base_url: String,
    /// HTTP client (reused across requests)
    client: reqwest::Client,
    /// Identity used to sign every write
    signer: Arc<dyn TransactionSigner>,
}

impl HttpLedgerClient {
    /// Create a new client with the default timeout
    pub fn new(base_url: &str, signer: Arc<dyn TransactionSigner>) -> LedgerResult<Self> {
        Self::with_timeout(base_url, signer, DEFAULT_TIMEOUT_SECS)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(
        base_url: &str,
        signer: Arc<dyn TransactionSigner>,
        timeout_secs: u64,
    ) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LedgerError::NetworkUnavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            signer,
        })
    }

    /// Base URL this client submits to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign and submit one instruction
    async fn submit(&self, instruction: LedgerInstruction) -> LedgerResult<TransactionReceipt> {
        let product_id = instruction.product_id();
        let tx = SignedTransaction::build(instruction, self.signer.as_ref())?;
        let url = format!("{}/api/v1/transactions", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&tx)
            .send()
            .await
            .map_err(|e| LedgerError::NetworkUnavailable(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::RecordNotFound(product_id));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            return Err(LedgerError::Unauthorized(text));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LedgerError::WriteRejected(format!(
                "status {}: {}",
                status, text
            )));
        }

        #[derive(Deserialize)]
        struct SubmitResponse {
            signature: String,
        }

        let result: SubmitResponse = response.json().await.map_err(|e| {
            LedgerError::MalformedRecord(format!("Failed to parse submit response: {}", e))
        })?;

        Ok(TransactionReceipt(result.signature))
    }
}

#[async_trait]
impl ProvenanceLedger for HttpLedgerClient {
    async fn create_product(
        &self,
        product_id: u64,
        name: &str,
        farm_name: &str,
    ) -> LedgerResult<TransactionReceipt> {
        let address = derive_record_address(product_id);
        debug!(
            product_id,
            address = %address,
            operation = "create_product",
            "Submitting create transaction"
        );

        self.submit(LedgerInstruction::CreateProduct {
            product_id,
            name: name.to_string(),
            farm_name: farm_name.to_string(),
        })
        .await
    }

    async fn add_log(
        &self,
        product_id: u64,
        status: &str,
        location: &str,
    ) -> LedgerResult<TransactionReceipt> {
        let address = derive_record_address(product_id);
        debug!(
            product_id,
            address = %address,
            operation = "add_log",
            "Submitting append transaction"
        );

        self.submit(LedgerInstruction::AddLog {
            product_id,
            status: status.to_string(),
            location: location.to_string(),
        })
        .await
    }

    async fn fetch_product(&self, product_id: u64) -> LedgerResult<Option<ProductRecord>> {
        let address = derive_record_address(product_id);
        let url = format!("{}/api/v1/accounts/{}", self.base_url, address.to_hex());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::NetworkUnavailable(format!("HTTP request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(product_id, address = %address, "No record at derived address");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(LedgerError::NetworkUnavailable(format!(
                "Failed to fetch account: status {}",
                response.status()
            )));
        }

        let record: ProductRecord = response.json().await.map_err(|e| {
            LedgerError::MalformedRecord(format!("Failed to decode account data: {}", e))
        })?;

        Ok(Some(record))
    }
}
