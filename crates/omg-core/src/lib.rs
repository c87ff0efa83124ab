//! Signed-message validation for OMG (Onion Mirror Guidelines) resources.
//!
//! Services publishing under the guidelines expose three well-known text
//! resources — `mirrors.txt`, `canary.txt`, `related.txt` — each a
//! clearsigned message. This crate validates them:
//!
//! - [`envelope`] parses the clearsign envelope into plaintext plus
//!   detached signature.
//! - [`keyring`] verifies the signature against a caller-supplied
//!   [`KeyRing`] and yields the signer [`Entity`].
//! - [`Mirrors`] extracts the ordered mirror URL list.
//! - [`Canary`] checks the proof-of-life statement: mandatory phrases, a
//!   Bitcoin block-hash token, and a dated 14-day validity window.
//!
//! All operations are synchronous, pure, and fail atomically — a malformed
//! or forged message never yields partial results. Fetching the resources
//! is the `omg-client` crate's job.
//!
//! # Example
//!
//! ```
//! use omg_core::Mirrors;
//!
//! let raw: Vec<u8> = b"-----BEGIN PGP SIGNED MESSAGE-----\n\n\
//! https://dark.fail\n\
//! -----BEGIN PGP SIGNATURE-----\n\nAAEC\n-----END PGP SIGNATURE-----\n"
//!     .to_vec();
//! let message = Mirrors::from(raw);
//! assert_eq!(message.list().unwrap(), vec!["https://dark.fail"]);
//! ```

pub mod canary;
pub mod envelope;
pub mod keyring;
pub mod mirrors;

#[cfg(test)]
pub(crate) mod testutil;

pub use canary::{Canary, CanaryError, CANARY_VALIDITY_DAYS, MANDATORY_PHRASES};
pub use envelope::{parse, EnvelopeError, SignedEnvelope};
pub use keyring::{compute_key_id, Ed25519Ring, Entity, KeyRing, VerifyError};
pub use mirrors::Mirrors;
