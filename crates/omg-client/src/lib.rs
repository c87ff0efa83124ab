//! HTTP fetcher for OMG (Onion Mirror Guidelines) resources.
//!
//! Downloads the three well-known text resources a participating host
//! publishes — `mirrors.txt`, `canary.txt`, `related.txt` — and returns
//! them as the typed messages from `omg-core`, ready for signature
//! verification and content validation.
//!
//! The transport contract: fixed resource names joined onto the host's
//! path, a user agent and timeout on every request, and only a `200 OK`
//! with a text content type and a bounded body passes through as bytes.
//! Anything else is a [`FetchError`], never bytes handed to the parser.
//!
//! # Example
//!
//! ```no_run
//! use omg_client::{Client, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::default())?;
//! let mirrors = client.mirrors("http://darkfailllnkf4vf.onion").await?;
//! for mirror in mirrors.list()? {
//!     println!("{mirror}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{Client, CANARY_RESOURCE, MIRRORS_RESOURCE, RELATED_RESOURCE};
pub use config::{ClientConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT, USER_AGENT_VALUE};
pub use error::{FetchError, FetchResult};
