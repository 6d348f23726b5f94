//! FreshTrace provenance ledger client
//!
//! Authenticated reads and writes against ledger-resident product records.
//! All operations derive their target address from the product id
//! ([`freshtrace_core::derive_record_address`]), so reads and writes are
//! O(1) and need no index.
//!
//! The client is stateless per call except for the signing identity; it is
//! single-attempt and fail-fast — failures are reported to the caller,
//! never retried here.

pub mod client;
pub mod http;
pub mod memory;
pub mod tx;

pub use client::ProvenanceLedger;
pub use http::HttpLedgerClient;
pub use memory::InMemoryLedger;
pub use tx::{LedgerInstruction, SignedTransaction};
