//! Core record types
//!
//! A `ProductRecord` lives at a derived ledger address: an immutable core
//! set at creation plus an append-only history tail. Records are never
//! deleted and history only grows.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for address parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Address has wrong length
    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

/// 32-byte derived record address
///
/// Addresses are computed deterministically from a domain tag and the
/// product id (see [`crate::address`]); no lookup table maps ids to
/// storage locations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordAddress(pub [u8; 32]);

impl RecordAddress {
    /// Create a new address from bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create an address from a hex string
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(AddressError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordAddress({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Opaque proof-of-inclusion token returned by a successful ledger write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt(pub String);

impl fmt::Display for TransactionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single supply-chain event in a product's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Free-text status description (e.g., "Shipped")
    pub status: String,
    /// Free-text location (e.g., "Distributor Warehouse")
    pub location: String,
    /// Ledger-assigned at append time; non-decreasing across the sequence
    pub timestamp: i64,
}

/// Ledger-resident product record
///
/// `product_id`, `name`, `farm_name`, `harvest_timestamp`, and `authority`
/// are immutable after creation. `history` is append-only, insertion order
/// = chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique identifier, assigned by the caller, never reused
    pub product_id: u64,
    /// Product name
    pub name: String,
    /// Origin farm name
    pub farm_name: String,
    /// Seconds since epoch, ledger-assigned at creation
    pub harvest_timestamp: i64,
    /// Public key of the identity allowed to append log entries
    pub authority: [u8; 32],
    /// Supply-chain event history
    pub history: Vec<LogEntry>,
}

impl ProductRecord {
    /// Timestamp of the most recent log entry, if any
    pub fn last_log_timestamp(&self) -> Option<i64> {
        self.history.last().map(|log| log.timestamp)
    }
}
