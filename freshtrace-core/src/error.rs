//! Error types for ledger operations

use thiserror::Error;

/// Ledger operation errors
///
/// Absence on fetch is NOT an error: `fetch_product` returns `Ok(None)`
/// for ids that were never created. `RecordNotFound` is reserved for
/// operations that require an existing record, such as appending a log.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// No record exists at the derived address
    #[error("Record not found for product {0}")]
    RecordNotFound(u64),

    /// Ledger refused a write (duplicate id, malformed input)
    #[error("Write rejected by ledger: {0}")]
    WriteRejected(String),

    /// Signing identity does not match the recorded authority
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transport-level failure reaching the ledger network
    #[error("Ledger network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Account data at the address could not be decoded
    #[error("Malformed record data: {0}")]
    MalformedRecord(String),

    /// Serialization failure while building a transaction
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
