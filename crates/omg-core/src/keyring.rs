//! Key rings for signature verification.
//!
//! Cryptography is delegated: the envelope layer hands the canonical
//! plaintext and the decoded signature body to a [`KeyRing`], and the ring
//! decides whether the signature is authentic and who produced it. Rings
//! are externally owned, read-only here, and safe to share across
//! concurrent verification calls.

use std::collections::HashMap;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::envelope::EnvelopeError;

/// Length of the key-id prefix embedded in a signature body.
pub const KEY_ID_PREFIX_LEN: usize = 8;

/// Length of a raw Ed25519 signature.
const ED25519_SIGNATURE_LEN: usize = 64;

/// Signature verification errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The message did not parse as a clearsigned envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The signature names a key that is not in the supplied ring.
    #[error("unknown signer: {key_id}")]
    UnknownSigner { key_id: String },

    /// The signature does not match the plaintext under the named key.
    #[error("invalid signature: {reason}")]
    Invalid { reason: String },
}

/// The signer identity returned by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Stable identifier of the matched key: lowercase hex SHA-256 of the
    /// raw verifying-key bytes.
    pub key_id: String,
    /// Optional human-readable label attached when the key was added.
    pub label: Option<String>,
}

/// A verification capability: a set of public keys a signature may be
/// checked against.
pub trait KeyRing {
    /// Check `signature` over `plaintext` against the ring.
    ///
    /// Returns the signer's identity only when the check passed. One
    /// deterministic check per call; no retries.
    fn verify(&self, plaintext: &[u8], signature: &[u8]) -> Result<Entity, VerifyError>;
}

/// Compute the key id for a verifying key.
pub fn compute_key_id(key: &VerifyingKey) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// First [`KEY_ID_PREFIX_LEN`] bytes of the key id, as embedded in
/// signature bodies.
pub(crate) fn key_id_prefix(key: &VerifyingKey) -> [u8; KEY_ID_PREFIX_LEN] {
    let digest = Sha256::digest(key.as_bytes());
    let mut prefix = [0u8; KEY_ID_PREFIX_LEN];
    prefix.copy_from_slice(&digest[..KEY_ID_PREFIX_LEN]);
    prefix
}

/// An Ed25519-backed key ring.
///
/// The signature body layout is an 8-byte key-id prefix followed by the
/// 64-byte Ed25519 signature; the prefix selects the ring key, which is
/// what lets verification distinguish an unknown signer from a signature
/// that simply does not match.
#[derive(Debug, Clone, Default)]
pub struct Ed25519Ring {
    keys: HashMap<[u8; KEY_ID_PREFIX_LEN], RingEntry>,
}

#[derive(Debug, Clone)]
struct RingEntry {
    key: VerifyingKey,
    key_id: String,
    label: Option<String>,
}

impl Ed25519Ring {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, builder style.
    pub fn with_key(mut self, key: VerifyingKey) -> Self {
        self.add_key(key, None);
        self
    }

    /// Add a labeled key, builder style.
    pub fn with_labeled_key(mut self, key: VerifyingKey, label: impl Into<String>) -> Self {
        self.add_key(key, Some(label.into()));
        self
    }

    /// Add a key with an optional label.
    pub fn add_key(&mut self, key: VerifyingKey, label: Option<String>) {
        let entry = RingEntry {
            key_id: compute_key_id(&key),
            key,
            label,
        };
        self.keys.insert(key_id_prefix(&entry.key), entry);
    }

    /// Number of keys in the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyRing for Ed25519Ring {
    fn verify(&self, plaintext: &[u8], signature: &[u8]) -> Result<Entity, VerifyError> {
        if signature.len() != KEY_ID_PREFIX_LEN + ED25519_SIGNATURE_LEN {
            return Err(VerifyError::Invalid {
                reason: format!(
                    "signature body is {} bytes, expected {}",
                    signature.len(),
                    KEY_ID_PREFIX_LEN + ED25519_SIGNATURE_LEN
                ),
            });
        }
        let (prefix, sig_bytes) = signature.split_at(KEY_ID_PREFIX_LEN);
        let entry = self
            .keys
            .get(prefix)
            .ok_or_else(|| VerifyError::UnknownSigner {
                key_id: hex::encode(prefix),
            })?;
        let sig = Signature::from_slice(sig_bytes).map_err(|e| VerifyError::Invalid {
            reason: e.to_string(),
        })?;
        entry
            .key
            .verify(plaintext, &sig)
            .map_err(|_| VerifyError::Invalid {
                reason: "signature does not match plaintext".to_string(),
            })?;
        Ok(Entity {
            key_id: entry.key_id.clone(),
            label: entry.label.clone(),
        })
    }
}

/// Parse a message and verify its signature in one step. Shared by the
/// message wrapper types.
pub(crate) fn verify_message(raw: &[u8], ring: &dyn KeyRing) -> Result<Entity, VerifyError> {
    let envelope = crate::envelope::parse(raw)?;
    ring.verify(&envelope.plaintext, &envelope.signature)
}
