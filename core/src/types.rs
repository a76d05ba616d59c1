//! Wire DTOs for the verification endpoint.
//!
//! # Design
//! Field names follow the endpoint's kebab-case JSON keys exactly. These
//! types are defined independently from the mock-server crate; integration
//! tests catch schema drift between the two.

use serde::{Deserialize, Serialize};

use crate::status::StatusCode;

/// Request payload posted to the verification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyRequest {
    /// Base64-encoded receipt, passed through untouched.
    #[serde(rename = "receipt-data")]
    pub receipt_data: String,
    /// Shared secret. Sent as an empty string when none is configured.
    #[serde(default)]
    pub password: String,
    /// Only meaningful for auto-renewable subscription receipts.
    #[serde(
        rename = "exclude-old-transactions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exclude_old_transactions: Option<bool>,
}

/// Response payload returned by the verification endpoint.
///
/// The endpoint omits `environment` and `is-retryable` on some error
/// responses, so both fall back to their defaults. `status` has no default:
/// a body without it is a deserialization error, never a success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {
    #[serde(default)]
    pub environment: String,
    #[serde(rename = "is-retryable", default)]
    pub is_retryable: bool,
    pub status: i32,
}

impl VerifyResponse {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from(self.status)
    }
}
