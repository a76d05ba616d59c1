//! Error types for receipt verification.
//!
//! # Design
//! Each failure kind gets its own variant so callers can tell a bad
//! configuration, a network problem, a protocol mismatch and a rejected
//! receipt apart. A rejected receipt (`Status`) is not a transport error: the
//! exchange succeeded and the server answered with a non-zero status.

use crate::status::StatusCode;

/// Errors returned by `ReceiptVerifier`.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The verifier was configured without a usable endpoint.
    #[error("invalid verifier configuration: {0}")]
    InvalidConfig(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// DNS, connect, TLS or timeout failure while sending the request.
    #[error("POST to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    /// The endpoint answered with a status other than 200.
    #[error("verification endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] ureq::Error),

    /// The response body was not a valid verification response.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The server processed the receipt and rejected it.
    #[error("receipt verification returned status {status}")]
    Status {
        status: StatusCode,
        environment: String,
        is_retryable: bool,
    },
}

impl VerifyError {
    /// The decoded status, if the server answered with one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            VerifyError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Network failures and 5xx responses are transient. For rejected
    /// receipts the server's `is-retryable` hint is authoritative, with
    /// 21005 and the internal band treated as transient even when the hint
    /// is absent. Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            VerifyError::Transport { .. } | VerifyError::BodyRead(_) => true,
            VerifyError::HttpStatus { status } => *status >= 500,
            VerifyError::Status {
                status,
                is_retryable,
                ..
            } => {
                *is_retryable
                    || matches!(status, StatusCode::ErrorServer | StatusCode::Internal(_))
            }
            VerifyError::InvalidConfig(_)
            | VerifyError::Serialization(_)
            | VerifyError::Deserialization(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_name_and_code() {
        let err = VerifyError::Status {
            status: StatusCode::ErrorReceiptSandbox,
            environment: "Sandbox".to_string(),
            is_retryable: false,
        };
        let message = err.to_string();
        assert!(message.contains("ErrorReceiptSandbox"), "{message}");
        assert!(message.contains("21007"), "{message}");
        assert_eq!(err.status(), Some(StatusCode::ErrorReceiptSandbox));
        assert!(!err.is_retryable());
    }

    #[test]
    fn http_status_error_mentions_code() {
        let err = VerifyError::HttpStatus { status: 500 };
        assert!(err.to_string().contains("500"));
        assert!(err.is_retryable());
        assert!(!VerifyError::HttpStatus { status: 404 }.is_retryable());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn server_hint_marks_status_retryable() {
        let hinted = VerifyError::Status {
            status: StatusCode::ErrorReceiptInvalid,
            environment: String::new(),
            is_retryable: true,
        };
        assert!(hinted.is_retryable());

        let unavailable = VerifyError::Status {
            status: StatusCode::ErrorServer,
            environment: String::new(),
            is_retryable: false,
        };
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn protocol_errors_are_not_retryable() {
        assert!(!VerifyError::Deserialization("eof".to_string()).is_retryable());
        assert!(!VerifyError::InvalidConfig("empty".to_string()).is_retryable());
    }
}
