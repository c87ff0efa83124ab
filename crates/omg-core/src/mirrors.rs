//! The mirror list message (`mirrors.txt`, `related.txt`).

use crate::envelope::{self, EnvelopeError};
use crate::keyring::{verify_message, Entity, KeyRing, VerifyError};

/// A fetched mirror list resource: an immutable byte sequence holding one
/// clearsigned message. `related.txt` uses the same shape and shares this
/// type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirrors(Vec<u8>);

impl From<Vec<u8>> for Mirrors {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Mirrors {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Mirrors {
    /// Verify the message signature against a key ring, returning the
    /// signer's identity on success.
    pub fn verify_signature(&self, ring: &dyn KeyRing) -> Result<Entity, VerifyError> {
        verify_message(&self.0, ring)
    }

    /// Extract the mirror URLs from the signed plaintext, in order of
    /// appearance. Duplicates are preserved.
    ///
    /// Verification is separate; call [`Mirrors::verify_signature`] before
    /// trusting the result.
    pub fn list(&self) -> Result<Vec<String>, EnvelopeError> {
        let envelope = envelope::parse(&self.0)?;
        Ok(extract_mirrors(&envelope.plaintext))
    }
}

/// Scan plaintext line by line and collect the lines that look like mirror
/// addresses. Comment lines and prose are skipped silently; the final line
/// is processed even without a trailing terminator.
fn extract_mirrors(plaintext: &[u8]) -> Vec<String> {
    plaintext
        .split(|&b| b == b'\n')
        .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
        .filter(|line| is_mirror(line))
        .collect()
}

/// A line qualifies as a mirror entry if it starts with an HTTP(S) scheme
/// or ends in a bare onion address.
fn is_mirror(line: &str) -> bool {
    line.starts_with("http://")
        || line.starts_with("https://")
        || line.ends_with(".onion")
        || line.ends_with(".onion/")
}
