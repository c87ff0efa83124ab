//! Clearsign envelope parsing.
//!
//! A clearsigned message carries its plaintext unaltered, followed by an
//! armored detached signature over that plaintext:
//!
//! ```text
//! -----BEGIN PGP SIGNED MESSAGE-----
//! Hash: SHA256
//!
//! <content lines, "- " dash-escape prefix removed>
//! -----BEGIN PGP SIGNATURE-----
//!
//! <base64 signature body>
//! -----END PGP SIGNATURE-----
//! ```
//!
//! Parsing is a pure function of the input bytes. Only structural
//! violations are errors; unusual but well-formed content (CRLF line
//! endings, whitespace around marker lines, a missing trailing newline)
//! parses fine.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Marker opening the signed-message section.
pub const BEGIN_SIGNED_MESSAGE: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
/// Marker opening the armored signature block.
pub const BEGIN_SIGNATURE: &str = "-----BEGIN PGP SIGNATURE-----";
/// Marker closing the armored signature block.
pub const END_SIGNATURE: &str = "-----END PGP SIGNATURE-----";

/// The input is not a recognizable clearsigned message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed envelope: {reason}")]
pub struct EnvelopeError {
    reason: String,
}

impl EnvelopeError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The structural violation that failed the parse.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A parsed clearsigned message: canonical plaintext plus the decoded
/// binary body of the armored signature block.
///
/// Ephemeral by design. Message types re-parse on every call rather than
/// holding one of these; nothing persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// Canonical plaintext: content lines with the dash escape removed and
    /// trailing whitespace stripped, joined with `\n`, no trailing newline.
    pub plaintext: Vec<u8>,
    /// Decoded signature body (armor headers and CRC line excluded).
    pub signature: Vec<u8>,
}

/// Parse raw bytes into a [`SignedEnvelope`].
///
/// Fails atomically: a malformed input yields no partial plaintext or
/// signature. Never panics, whatever the input.
pub fn parse(raw: &[u8]) -> Result<SignedEnvelope, EnvelopeError> {
    let mut lines = raw.split(|&b| b == b'\n').map(strip_cr);

    // Leading blank lines are tolerated; the first non-blank line must be
    // the signed-message marker. Marker lines are compared with surrounding
    // whitespace trimmed.
    loop {
        match lines.next() {
            Some(line) if line.trim_ascii().is_empty() => continue,
            Some(line) if line.trim_ascii() == BEGIN_SIGNED_MESSAGE.as_bytes() => break,
            Some(_) | None => {
                return Err(EnvelopeError::new("missing signed message header"))
            }
        }
    }

    // Armor headers ("Hash: SHA256") run until the first blank line. A
    // colon-free line before the blank is treated as the start of content,
    // for lenience toward envelopes that skip the blank separator.
    let mut content: Vec<Vec<u8>> = Vec::new();
    let mut in_content = false;
    let mut saw_signature_marker = false;
    for line in &mut lines {
        let trimmed = line.trim_ascii();
        if !in_content {
            if trimmed.is_empty() {
                in_content = true;
                continue;
            }
            if trimmed.contains(&b':') {
                continue;
            }
            in_content = true;
        }
        if trimmed == BEGIN_SIGNATURE.as_bytes() {
            saw_signature_marker = true;
            break;
        }
        // Content lines keep leading whitespace; only trailing whitespace
        // is canonicalized away.
        content.push(unescape_dashes(line).trim_ascii_end().to_vec());
    }
    if !saw_signature_marker {
        return Err(EnvelopeError::new("missing signature block"));
    }

    // Signature armor: optional headers, base64 body, optional "=" CRC
    // line, closing marker. Anything after the closing marker is ignored.
    let mut body = Vec::new();
    let mut saw_end_marker = false;
    for line in &mut lines {
        let line = line.trim_ascii();
        if line == END_SIGNATURE.as_bytes() {
            saw_end_marker = true;
            break;
        }
        if line.is_empty() || line.contains(&b':') || line.starts_with(b"=") {
            continue;
        }
        body.extend_from_slice(line);
    }
    if !saw_end_marker {
        return Err(EnvelopeError::new("truncated signature block"));
    }
    if body.is_empty() {
        return Err(EnvelopeError::new("empty signature block"));
    }
    let signature = BASE64
        .decode(&body)
        .map_err(|e| EnvelopeError::new(format!("undecodable signature body: {e}")))?;

    // Trailing blank lines belong to the signature marker, not the text.
    while content.last().is_some_and(|line| line.is_empty()) {
        content.pop();
    }

    Ok(SignedEnvelope {
        plaintext: content.join(&b'\n'),
        signature,
    })
}

/// Strip the CR of a CRLF line ending.
fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Remove the "- " prefix that escapes content lines starting with a dash.
fn unescape_dashes(line: &[u8]) -> &[u8] {
    line.strip_prefix(b"- ").unwrap_or(line)
}
