//! FreshTrace core types and primitives
//!
//! This crate provides the building blocks shared by the ledger client and
//! the insight pipeline:
//! - Record and log entry types ([`types`])
//! - Deterministic record address derivation ([`address`])
//! - The service signing identity and signer trait ([`identity`])
//! - The ledger error taxonomy ([`error`])
//! - Structured logging conventions ([`logging`])

pub mod address;
pub mod error;
pub mod identity;
pub mod logging;
pub mod types;

pub use address::derive_record_address;
pub use error::{LedgerError, LedgerResult};
pub use identity::{SigningIdentity, TransactionSigner};
pub use types::{LogEntry, ProductRecord, RecordAddress, TransactionReceipt};
