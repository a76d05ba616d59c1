//! Blocking client for in-app purchase receipt verification.
//!
//! # Overview
//! Posts an opaque receipt blob plus a shared secret to a verification
//! endpoint and interprets the numeric status it answers with. `verify`
//! returns `Ok` only for status 0; configuration, transport, protocol and
//! business failures each surface as a distinct `VerifyError` variant.
//!
//! # Design
//! - `ReceiptVerifier` holds an immutable config and a shared ureq agent and
//!   is safe to use from many threads at once.
//! - `build_verify_request` / `parse_verify_response` expose the wire
//!   contract to callers that execute HTTP themselves.
//! - The crate emits `tracing` events but never installs a subscriber.
//! - No retries, caching or receipt decoding; `VerifyError::is_retryable`
//!   gives callers what they need to build their own policy.

pub mod config;
pub mod error;
pub mod http;
pub mod status;
pub mod types;
pub mod verifier;

pub use config::{Environment, VerifierConfig, PRODUCTION_VERIFY_URL, SANDBOX_VERIFY_URL};
pub use error::VerifyError;
pub use http::{HttpRequest, HttpResponse};
pub use status::{describe, StatusCode};
pub use types::{VerifyRequest, VerifyResponse};
pub use verifier::ReceiptVerifier;
