//! Provenance ledger client trait

use async_trait::async_trait;
use freshtrace_core::{LedgerResult, ProductRecord, TransactionReceipt};

/// Client interface for ledger-resident product records
///
/// This abstraction allows for different implementations:
/// - HTTP client against a remote ledger node
/// - In-memory ledger (testing, local development)
#[async_trait]
pub trait ProvenanceLedger: Send + Sync {
    /// Create a product record at its derived address.
    ///
    /// The ledger assigns the harvest timestamp and records the signing
    /// identity as the record's authority. A duplicate id fails with
    /// `WriteRejected` — address creation is mutually exclusive on the
    /// ledger side, so at most one of two racing creates succeeds.
    async fn create_product(
        &self,
        product_id: u64,
        name: &str,
        farm_name: &str,
    ) -> LedgerResult<TransactionReceipt>;

    /// Append a log entry to an existing record's history.
    ///
    /// The entry timestamp is assigned by the ledger at inclusion time,
    /// never supplied by the caller. Fails with `RecordNotFound` if the
    /// record does not exist and `Unauthorized` if the signing identity
    /// does not match the recorded authority.
    async fn add_log(
        &self,
        product_id: u64,
        status: &str,
        location: &str,
    ) -> LedgerResult<TransactionReceipt>;

    /// Fetch the record for a product id.
    ///
    /// Returns `Ok(None)` for ids that were never created — absence is an
    /// expected outcome, not an error. Transport failures and undecodable
    /// account data surface as distinct errors so callers can tell
    /// "doesn't exist" apart from "could not be determined".
    async fn fetch_product(&self, product_id: u64) -> LedgerResult<Option<ProductRecord>>;
}
