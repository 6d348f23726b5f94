//! Signed transaction envelope
//!
//! Every write is submitted as a [`SignedTransaction`]: the instruction,
//! its derived target address, and an Ed25519 signature over the canonical
//! payload bytes under the transaction domain tag.

use freshtrace_core::{derive_record_address, LedgerResult, RecordAddress, TransactionSigner};
use serde::{Deserialize, Serialize};

/// Ledger program instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum LedgerInstruction {
    /// Establish the immutable core fields and an empty history
    CreateProduct {
        product_id: u64,
        name: String,
        farm_name: String,
    },
    /// Append a log entry; the ledger assigns the timestamp
    AddLog {
        product_id: u64,
        status: String,
        location: String,
    },
}

impl LedgerInstruction {
    /// Product id this instruction targets
    pub fn product_id(&self) -> u64 {
        match self {
            Self::CreateProduct { product_id, .. } | Self::AddLog { product_id, .. } => *product_id,
        }
    }

    /// Derived target address for this instruction
    pub fn target_address(&self) -> RecordAddress {
        derive_record_address(self.product_id())
    }
}

/// Signed transaction submitted to the ledger network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Target address (hex)
    pub address: String,
    /// Instruction to execute
    pub instruction: LedgerInstruction,
    /// Signer public key (hex)
    pub signer_pubkey: String,
    /// Signature over the canonical payload (hex)
    pub signature: String,
}

impl SignedTransaction {
    /// Build and sign a transaction for the given instruction
    pub fn build(
        instruction: LedgerInstruction,
        signer: &dyn TransactionSigner,
    ) -> LedgerResult<Self> {
        let address = instruction.target_address();
        let payload = signing_payload(&address, &instruction)?;
        let signature = signer.sign_payload(&payload);

        Ok(Self {
            address: address.to_hex(),
            instruction,
            signer_pubkey: hex::encode(signer.public_key_bytes()),
            signature: hex::encode(signature),
        })
    }
}

/// Canonical bytes covered by the transaction signature:
/// the 32 address bytes followed by the JSON-encoded instruction.
pub fn signing_payload(
    address: &RecordAddress,
    instruction: &LedgerInstruction,
) -> LedgerResult<Vec<u8>> {
    let mut payload = address.as_bytes().to_vec();
    payload.extend_from_slice(&serde_json::to_vec(instruction)?);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshtrace_core::identity::{domain, verify_tagged};
    use freshtrace_core::SigningIdentity;

    #[test]
    fn test_instruction_targets_derived_address() {
        let instruction = LedgerInstruction::CreateProduct {
            product_id: 7,
            name: "Mango".to_string(),
            farm_name: "Sunny Farm".to_string(),
        };
        assert_eq!(instruction.target_address(), derive_record_address(7));
    }

    #[test]
    fn test_build_produces_verifiable_signature() {
        let identity = SigningIdentity::generate();
        let instruction = LedgerInstruction::AddLog {
            product_id: 7,
            status: "Shipped".to_string(),
            location: "Warehouse B".to_string(),
        };

        let tx = SignedTransaction::build(instruction.clone(), &identity).unwrap();

        assert_eq!(tx.address, derive_record_address(7).to_hex());
        assert_eq!(tx.signer_pubkey, identity.public_key_hex());

        let payload = signing_payload(&instruction.target_address(), &instruction).unwrap();
        let signature: [u8; 64] = hex::decode(&tx.signature).unwrap().try_into().unwrap();
        assert!(verify_tagged(
            &identity.public_key_bytes(),
            domain::TRANSACTION,
            &payload,
            &signature
        ));
    }

    #[test]
    fn test_instruction_wire_format_roundtrip() {
        let instruction = LedgerInstruction::CreateProduct {
            product_id: 42,
            name: "Papaya".to_string(),
            farm_name: "Green Valley".to_string(),
        };

        let json = serde_json::to_string(&instruction).unwrap();
        assert!(json.contains("\"instruction\":\"create_product\""));

        let restored: LedgerInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(instruction, restored);
    }
}
