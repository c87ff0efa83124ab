//! The warrant canary message (`canary.txt`).
//!
//! A canary is a periodically reissued signed statement proving the
//! operator still controls their signing key as of a stated date. Validity
//! is checked against a caller-supplied reference time, never the wall
//! clock, so results are reproducible.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::envelope::{self, EnvelopeError};
use crate::keyring::{verify_message, Entity, KeyRing, VerifyError};

/// Days a canary stays valid after its stated date. Matches the commitment
/// in the second mandatory phrase.
pub const CANARY_VALIDITY_DAYS: i64 = 14;

/// Phrases that must appear literally in every canary, in check order.
pub const MANDATORY_PHRASES: [&str; 2] = [
    "I am in control of my PGP key",
    "I will update this canary within 14 days",
];

lazy_static! {
    /// Bitcoin block hash with the fixed-difficulty leading-zero prefix.
    /// Shape only; the value is deliberately not checked against the chain.
    static ref BLOCK_HASH: Regex = Regex::new(r"[0]{8}[a-fA-F0-9]{56}").unwrap();
    /// Proof-of-life date statement.
    static ref DATE: Regex = Regex::new(r"Today is ([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap();
}

/// Canary validation errors, in the order the checks run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanaryError {
    /// The message did not parse as a clearsigned envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// A mandatory phrase is absent.
    #[error("mandatory phrase missing: '{phrase}'")]
    MissingPhrase { phrase: &'static str },

    /// No Bitcoin block hash token found.
    #[error("bitcoin block hash is missing")]
    MissingBlockHash,

    /// No "Today is YYYY-MM-DD" statement found.
    #[error("date is missing")]
    MissingDate,

    /// The date statement matched the shape but is not a real calendar
    /// date.
    #[error("invalid date: {value}")]
    InvalidDate { value: String },

    /// The reference time is past the canary's validity window.
    #[error("canary has expired: signed {date}, valid through {valid_until}")]
    Expired {
        date: NaiveDate,
        valid_until: DateTime<Utc>,
    },
}

/// A fetched canary resource: an immutable byte sequence holding one
/// clearsigned message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canary(Vec<u8>);

impl From<Vec<u8>> for Canary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Canary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Canary {
    /// Verify the message signature against a key ring, returning the
    /// signer's identity on success.
    pub fn verify_signature(&self, ring: &dyn KeyRing) -> Result<Entity, VerifyError> {
        verify_message(&self.0, ring)
    }

    /// Validate the canary content against a reference time.
    ///
    /// Checks run in a fixed order and stop at the first failure: mandatory
    /// phrases, block-hash token, date presence, date validity, expiry. The
    /// error a caller observes identifies the first violated rule.
    pub fn validate(&self, reference: DateTime<Utc>) -> Result<(), CanaryError> {
        let envelope = envelope::parse(&self.0)?;
        validate_plaintext(&envelope.plaintext, reference)
    }
}

fn validate_plaintext(plaintext: &[u8], reference: DateTime<Utc>) -> Result<(), CanaryError> {
    find_phrases(plaintext)?;
    find_block_hash(plaintext)?;
    let date = extract_date(plaintext)?;
    let valid_until = date.and_time(NaiveTime::MIN).and_utc() + Duration::days(CANARY_VALIDITY_DAYS);
    if reference > valid_until {
        return Err(CanaryError::Expired { date, valid_until });
    }
    Ok(())
}

fn find_phrases(plaintext: &[u8]) -> Result<(), CanaryError> {
    for phrase in MANDATORY_PHRASES {
        if !contains(plaintext, phrase.as_bytes()) {
            return Err(CanaryError::MissingPhrase { phrase });
        }
    }
    Ok(())
}

fn find_block_hash(plaintext: &[u8]) -> Result<(), CanaryError> {
    if !BLOCK_HASH.is_match(plaintext) {
        return Err(CanaryError::MissingBlockHash);
    }
    Ok(())
}

fn extract_date(plaintext: &[u8]) -> Result<NaiveDate, CanaryError> {
    let captures = DATE.captures(plaintext).ok_or(CanaryError::MissingDate)?;
    let matched = captures
        .get(1)
        .map(|group| String::from_utf8_lossy(group.as_bytes()).into_owned())
        .ok_or(CanaryError::MissingDate)?;
    NaiveDate::parse_from_str(&matched, "%Y-%m-%d").map_err(|_| CanaryError::InvalidDate {
        value: matched,
    })
}

/// Literal case-sensitive substring search over raw bytes.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{clearsign, clearsign_raw, generate_keypair};

    const BLOCK_HASH_LINE: &str =
        "00000000000000000008a89e854d57e5667df88f1cbef00f1efb73c0a3Df0791";

    fn canary_body(date_line: &str) -> String {
        format!(
            "{date_line}\n\
             I am in control of my PGP key.\n\
             I will update this canary within 14 days.\n\
             Latest bitcoin block: {BLOCK_HASH_LINE}"
        )
    }

    fn at(date: &str) -> DateTime<Utc> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .expect("bad test date")
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    #[test]
    fn accepts_valid_canary_within_window() {
        let message = Canary::from(clearsign_raw(&canary_body("Today is 2019-10-29"), b"sig"));
        message.validate(at("2019-11-11")).expect("validate failed");
    }

    #[test]
    fn accepts_canary_on_expiry_boundary() {
        // 2019-10-29 + 14 days = 2019-11-12T00:00:00Z, inclusive.
        let message = Canary::from(clearsign_raw(&canary_body("Today is 2019-10-29"), b"sig"));
        message.validate(at("2019-11-12")).expect("validate failed");
    }

    #[test]
    fn rejects_expired_canary() {
        let message = Canary::from(clearsign_raw(&canary_body("Today is 2019-10-29"), b"sig"));
        let err = message.validate(at("2019-11-13")).unwrap_err();
        assert!(matches!(err, CanaryError::Expired { .. }));
    }

    #[test]
    fn reports_missing_control_phrase_first() {
        let body = canary_body("Today is 2019-10-29").replace("control of my PGP key", "???");
        let message = Canary::from(clearsign_raw(&body, b"sig"));
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert_eq!(
            err,
            CanaryError::MissingPhrase {
                phrase: MANDATORY_PHRASES[0]
            }
        );
    }

    #[test]
    fn reports_missing_update_phrase() {
        let body = canary_body("Today is 2019-10-29").replace("within 14 days", "eventually");
        let message = Canary::from(clearsign_raw(&body, b"sig"));
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert_eq!(
            err,
            CanaryError::MissingPhrase {
                phrase: MANDATORY_PHRASES[1]
            }
        );
    }

    #[test]
    fn reports_missing_block_hash() {
        let body = canary_body("Today is 2019-10-29").replace(BLOCK_HASH_LINE, "none");
        let message = Canary::from(clearsign_raw(&body, b"sig"));
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert_eq!(err, CanaryError::MissingBlockHash);
    }

    #[test]
    fn reports_missing_date() {
        let message = Canary::from(clearsign_raw(&canary_body("no date here"), b"sig"));
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert_eq!(err, CanaryError::MissingDate);
    }

    #[test]
    fn reports_semantically_invalid_date() {
        let message = Canary::from(clearsign_raw(&canary_body("Today is 2019-10-32"), b"sig"));
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert_eq!(
            err,
            CanaryError::InvalidDate {
                value: "2019-10-32".to_string()
            }
        );
    }

    #[test]
    fn phrase_failure_masks_later_failures() {
        // Missing phrase AND missing date: the phrase error wins.
        let body = format!("nothing mandatory here\n{BLOCK_HASH_LINE}");
        let message = Canary::from(clearsign_raw(&body, b"sig"));
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert!(matches!(err, CanaryError::MissingPhrase { .. }));
    }

    #[test]
    fn unparseable_message_is_an_envelope_error() {
        let message = Canary::from(b"not signed at all".to_vec());
        let err = message.validate(at("2019-11-11")).unwrap_err();
        assert!(matches!(err, CanaryError::Envelope(_)));
    }

    #[test]
    fn verify_signature_returns_signer() {
        let key = generate_keypair();
        let message = Canary::from(clearsign(&key, &canary_body("Today is 2019-10-29")));
        let ring = crate::keyring::Ed25519Ring::new().with_key(key.verifying_key());
        message.verify_signature(&ring).expect("verify failed");
    }
}
