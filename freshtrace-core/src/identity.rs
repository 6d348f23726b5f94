//! Service signing identity
//!
//! One long-lived Ed25519 key pair authorizes every ledger write. The
//! identity is constructed explicitly and handed to clients at build time,
//! never held as ambient global state, so a test process can run several
//! identities side by side.
//!
//! Signatures use domain separation tags so transaction signatures can
//! never be replayed in another context.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;
use std::fmt;
use thiserror::Error;

/// Domain separation tags for signing contexts
pub mod domain {
    /// Tag for provenance transaction signing
    pub const TRANSACTION: &[u8] = b"freshtrace:tx:v1\0";
}

/// Error type for identity construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Key material has wrong length
    #[error("Invalid key length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Signing capability required by ledger clients
///
/// Two capabilities: expose the public key that identifies the authority,
/// and sign a transaction payload. Any conforming implementation
/// substitutes — the in-memory [`SigningIdentity`], a hardware-backed
/// signer, or a test mock.
pub trait TransactionSigner: Send + Sync {
    /// Public key bytes identifying this authority
    fn public_key_bytes(&self) -> [u8; 32];

    /// Sign a canonical transaction payload
    fn sign_payload(&self, payload: &[u8]) -> Vec<u8>;
}

/// Ed25519 key pair for signing ledger transactions
#[derive(Clone)]
pub struct SigningIdentity {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    /// Key identifier (hex-encoded public key prefix)
    pub kid: String,
}

impl SigningIdentity {
    /// Generate a new random identity
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Create from existing secret key bytes (32 bytes)
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(bytes))
    }

    /// Create from a hex-encoded secret key
    pub fn from_hex(hex_str: &str) -> Result<Self, IdentityError> {
        let bytes = hex::decode(hex_str).map_err(|e| IdentityError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(IdentityError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self::from_bytes(&arr))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        let kid = hex::encode(&verifying_key.to_bytes()[..8]);
        Self {
            signing_key,
            verifying_key,
            kid,
        }
    }

    /// Get the public key bytes (32 bytes)
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Get the public key as hex string
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.to_bytes())
    }

    /// Sign a message under a domain separation tag
    pub fn sign_tagged(&self, domain_tag: &[u8], message: &[u8]) -> [u8; 64] {
        let mut buf = Vec::with_capacity(domain_tag.len() + message.len());
        buf.extend_from_slice(domain_tag);
        buf.extend_from_slice(message);
        self.signing_key.sign(&buf).to_bytes()
    }
}

/// Verify a domain-tagged signature against a public key
pub fn verify_tagged(
    public_key: &[u8; 32],
    domain_tag: &[u8],
    message: &[u8],
    signature: &[u8; 64],
) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let mut buf = Vec::with_capacity(domain_tag.len() + message.len());
    buf.extend_from_slice(domain_tag);
    buf.extend_from_slice(message);
    verifying_key
        .verify(&buf, &Signature::from_bytes(signature))
        .is_ok()
}

impl TransactionSigner for SigningIdentity {
    fn public_key_bytes(&self) -> [u8; 32] {
        self.public_key_bytes()
    }

    fn sign_payload(&self, payload: &[u8]) -> Vec<u8> {
        self.sign_tagged(domain::TRANSACTION, payload).to_vec()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret key material is never printed
        write!(f, "SigningIdentity(kid={})", self.kid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let identity = SigningIdentity::generate();
        let signature = identity.sign_tagged(domain::TRANSACTION, b"payload");

        assert!(verify_tagged(
            &identity.public_key_bytes(),
            domain::TRANSACTION,
            b"payload",
            &signature
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_domain() {
        let identity = SigningIdentity::generate();
        let signature = identity.sign_tagged(domain::TRANSACTION, b"payload");

        assert!(!verify_tagged(
            &identity.public_key_bytes(),
            b"freshtrace:other:v1\0",
            b"payload",
            &signature
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let identity = SigningIdentity::generate();
        let other = SigningIdentity::generate();
        let signature = identity.sign_tagged(domain::TRANSACTION, b"payload");

        assert!(!verify_tagged(
            &other.public_key_bytes(),
            domain::TRANSACTION,
            b"payload",
            &signature
        ));
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let seed = [0x5au8; 32];
        let identity = SigningIdentity::from_bytes(&seed);
        let restored = SigningIdentity::from_hex(&hex::encode(seed)).unwrap();

        assert_eq!(identity.public_key_bytes(), restored.public_key_bytes());
        assert_eq!(identity.kid, restored.kid);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            SigningIdentity::from_hex("zz"),
            Err(IdentityError::InvalidHex(_))
        ));
        assert!(matches!(
            SigningIdentity::from_hex("deadbeef"),
            Err(IdentityError::InvalidLength(4))
        ));
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let identity = SigningIdentity::from_bytes(&[7u8; 32]);
        let printed = format!("{:?}", identity);
        assert!(printed.contains(&identity.kid));
        assert!(!printed.contains(&hex::encode([7u8; 32])));
    }
}
