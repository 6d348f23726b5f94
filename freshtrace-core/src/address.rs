//! Deterministic record address derivation
//!
//! Record addresses are computed from a fixed domain-separation tag and the
//! little-endian encoding of the product id, hashed with SHA-256. Any party
//! that knows a product id can recompute the address; reads and writes need
//! no index or coordination service.

use sha2::{Digest, Sha256};

use crate::types::RecordAddress;

/// Domain separation tags for derived addresses
pub mod domain {
    /// Tag for product provenance records
    pub const PRODUCT_RECORD: &[u8] = b"product";
}

/// Derive the storage address for a product record.
///
/// Pure and total for all `u64` ids: the same id yields a byte-identical
/// address on every call, and distinct ids collide only with negligible
/// probability. The rest of the system depends on this for idempotent
/// addressing.
pub fn derive_record_address(product_id: u64) -> RecordAddress {
    let mut hasher = Sha256::new();
    hasher.update(domain::PRODUCT_RECORD);
    hasher.update(product_id.to_le_bytes());

    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    RecordAddress(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive_record_address(7);
        let b = derive_record_address(7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_distinct_ids_distinct_addresses() {
        let a = derive_record_address(7);
        let b = derive_record_address(8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_boundary_ids() {
        // Distinct addresses at the edges of the id space
        let zero = derive_record_address(0);
        let max = derive_record_address(u64::MAX);
        assert_ne!(zero, max);
    }

    #[test]
    fn test_derive_encoding_is_little_endian() {
        // 1 and 1 << 56 differ only in byte order; the addresses must differ
        let low = derive_record_address(1);
        let high = derive_record_address(1u64 << 56);
        assert_ne!(low, high);
    }

    #[test]
    fn test_derived_address_hex_length() {
        let address = derive_record_address(42);
        assert_eq!(address.to_hex().len(), 64);
    }
}
