//! In-memory ledger
//!
//! Implements the ledger-side rules the network enforces in production:
//! at most one create per address, authority-checked appends, and
//! ledger-assigned non-decreasing timestamps. Serves tests and local
//! development; writes serialize through one lock per store, matching the
//! per-address write serialization the real network provides.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use freshtrace_core::{
    derive_record_address, LedgerError, LedgerResult, LogEntry, ProductRecord, RecordAddress,
    TransactionReceipt, TransactionSigner,
};

use crate::client::ProvenanceLedger;

/// Clock used for ledger-assigned timestamps
type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// In-memory provenance ledger
pub struct InMemoryLedger {
    store: Arc<RwLock<HashMap<RecordAddress, ProductRecord>>>,
    signer: Arc<dyn TransactionSigner>,
    clock: Clock,
    sequence: Arc<AtomicU64>,
}

impl InMemoryLedger {
    /// Create an empty ledger using the system clock
    pub fn new(signer: Arc<dyn TransactionSigner>) -> Self {
        Self::with_clock(signer, Arc::new(|| Utc::now().timestamp()))
    }

    /// Create an empty ledger with an injected clock so tests control
    /// ledger-assigned timestamps
    pub fn with_clock(signer: Arc<dyn TransactionSigner>, clock: Clock) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            signer,
            clock,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A second client handle over the same underlying store, signing with
    /// a different identity. Lets tests exercise authority enforcement.
    pub fn with_signer(&self, signer: Arc<dyn TransactionSigner>) -> Self {
        Self {
            store: self.store.clone(),
            signer,
            clock: self.clock.clone(),
            sequence: self.sequence.clone(),
        }
    }

    /// Number of records in the store
    pub async fn record_count(&self) -> usize {
        self.store.read().await.len()
    }

    fn next_receipt(&self, kind: &str, address: &RecordAddress) -> TransactionReceipt {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        TransactionReceipt(format!("{}_{}_{:08x}", kind, &address.to_hex()[..16], seq))
    }
}

#[async_trait]
impl ProvenanceLedger for InMemoryLedger {
    async fn create_product(
        &self,
        product_id: u64,
        name: &str,
        farm_name: &str,
    ) -> LedgerResult<TransactionReceipt> {
        let address = derive_record_address(product_id);
        let mut store = self.store.write().await;

        if store.contains_key(&address) {
            return Err(LedgerError::WriteRejected(format!(
                "record already exists at {}",
                address
            )));
        }

        store.insert(
            address,
            ProductRecord {
                product_id,
                name: name.to_string(),
                farm_name: farm_name.to_string(),
                harvest_timestamp: (self.clock)(),
                authority: self.signer.public_key_bytes(),
                history: Vec::new(),
            },
        );

        debug!(product_id, address = %address, operation = "create_product", "Record created");
        Ok(self.next_receipt("create", &address))
    }

    async fn add_log(
        &self,
        product_id: u64,
        status: &str,
        location: &str,
    ) -> LedgerResult<TransactionReceipt> {
        let address = derive_record_address(product_id);
        let mut store = self.store.write().await;

        let record = store
            .get_mut(&address)
            .ok_or(LedgerError::RecordNotFound(product_id))?;

        if record.authority != self.signer.public_key_bytes() {
            return Err(LedgerError::Unauthorized(
                "signing identity does not match record authority".to_string(),
            ));
        }

        // Clamp to the previous entry so the sequence stays non-decreasing
        // even under clock skew
        let now = (self.clock)();
        let timestamp = record
            .last_log_timestamp()
            .map_or(now, |last| now.max(last));

        record.history.push(LogEntry {
            status: status.to_string(),
            location: location.to_string(),
            timestamp,
        });

        debug!(product_id, address = %address, operation = "add_log", "Log entry appended");
        Ok(self.next_receipt("append", &address))
    }

    async fn fetch_product(&self, product_id: u64) -> LedgerResult<Option<ProductRecord>> {
        let address = derive_record_address(product_id);
        let store = self.store.read().await;
        Ok(store.get(&address).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshtrace_core::SigningIdentity;

    fn test_ledger() -> InMemoryLedger {
        InMemoryLedger::new(Arc::new(SigningIdentity::generate()))
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let ledger = test_ledger();
        ledger.create_product(7, "Mango", "Sunny Farm").await.unwrap();

        let record = ledger.fetch_product(7).await.unwrap().unwrap();
        assert_eq!(record.product_id, 7);
        assert_eq!(record.name, "Mango");
        assert_eq!(record.farm_name, "Sunny Farm");
        assert!(record.history.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let ledger = test_ledger();
        ledger.create_product(7, "Mango", "Sunny Farm").await.unwrap();

        let result = ledger.create_product(7, "Mango", "Sunny Farm").await;
        assert!(matches!(result, Err(LedgerError::WriteRejected(_))));
        assert_eq!(ledger.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_never_created_is_none() {
        let ledger = test_ledger();
        let result = ledger.fetch_product(99999).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_add_log_requires_existing_record() {
        let ledger = test_ledger();
        let result = ledger.add_log(99999, "Shipped", "Warehouse B").await;
        assert!(matches!(result, Err(LedgerError::RecordNotFound(99999))));
    }

    #[tokio::test]
    async fn test_add_log_enforces_authority() {
        let ledger = test_ledger();
        ledger.create_product(7, "Mango", "Sunny Farm").await.unwrap();

        let other = ledger.with_signer(Arc::new(SigningIdentity::generate()));
        let result = other.add_log(7, "Shipped", "Warehouse B").await;
        assert!(matches!(result, Err(LedgerError::Unauthorized(_))));

        // The original identity still appends fine
        ledger.add_log(7, "Shipped", "Warehouse B").await.unwrap();
    }

    #[tokio::test]
    async fn test_timestamps_non_decreasing_under_clock_skew() {
        let signer = Arc::new(SigningIdentity::generate());
        let ticks = Arc::new(AtomicU64::new(0));
        let ticks_clone = ticks.clone();
        // Clock runs backwards: 500, 400, 300...
        let clock: Clock = Arc::new(move || {
            500 - 100 * ticks_clone.fetch_add(1, Ordering::SeqCst) as i64
        });
        let ledger = InMemoryLedger::with_clock(signer, clock);

        ledger.create_product(1, "Apple", "Orchard").await.unwrap();
        ledger.add_log(1, "Packed", "Shed").await.unwrap();
        ledger.add_log(1, "Shipped", "Depot").await.unwrap();

        let record = ledger.fetch_product(1).await.unwrap().unwrap();
        let timestamps: Vec<i64> = record.history.iter().map(|log| log.timestamp).collect();
        assert_eq!(timestamps.len(), 2);
        assert!(timestamps[0] <= timestamps[1]);
    }

    #[tokio::test]
    async fn test_receipts_are_unique() {
        let ledger = test_ledger();
        let a = ledger.create_product(1, "Apple", "Orchard").await.unwrap();
        let b = ledger.add_log(1, "Packed", "Shed").await.unwrap();
        assert_ne!(a, b);
    }
}
