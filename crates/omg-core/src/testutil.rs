//! Fixtures shared by the unit tests: envelope construction and Ed25519
//! signing helpers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signer, SigningKey};

use crate::keyring::key_id_prefix;

pub fn generate_keypair() -> SigningKey {
    SigningKey::generate(&mut rand::thread_rng())
}

/// Build a well-formed envelope around `text` with an arbitrary signature
/// body. Parse and extraction paths never verify, so most tests need no
/// real key.
pub fn clearsign_raw(text: &str, signature: &[u8]) -> Vec<u8> {
    let escaped = text
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                format!("- {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "-----BEGIN PGP SIGNED MESSAGE-----\n\
         Hash: SHA256\n\
         \n\
         {escaped}\n\
         -----BEGIN PGP SIGNATURE-----\n\
         \n\
         {body}\n\
         -----END PGP SIGNATURE-----\n",
        body = BASE64.encode(signature)
    )
    .into_bytes()
}

/// Clearsign `text` with a real key: the signature body is the 8-byte
/// key-id prefix followed by the Ed25519 signature over the canonical
/// plaintext (the exact bytes the parser will produce).
pub fn clearsign(key: &SigningKey, text: &str) -> Vec<u8> {
    let canonical = canonical_text(text);
    let sig = key.sign(canonical.as_bytes());
    let mut body = Vec::with_capacity(72);
    body.extend_from_slice(&key_id_prefix(&key.verifying_key()));
    body.extend_from_slice(&sig.to_bytes());
    clearsign_raw(text, &body)
}

/// Mirror of the parser's plaintext canonicalization: trailing whitespace
/// stripped per line, trailing blank lines dropped, `\n` separators.
fn canonical_text(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
