//! The receipt verifier: one POST per call, one result per call.
//!
//! # Design
//! `ReceiptVerifier` holds an immutable `VerifierConfig` and a ureq agent.
//! The agent pools connections internally and is `Send + Sync`, so a single
//! verifier can be shared across threads without locking. `verify` is split
//! into `build_verify_request` and `parse_verify_response` around the
//! network round-trip so callers with their own transport can reuse the
//! wire contract.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::VerifierConfig;
use crate::error::VerifyError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{VerifyRequest, VerifyResponse};

/// Blocking client for the receipt verification endpoint.
#[derive(Clone)]
pub struct ReceiptVerifier {
    config: VerifierConfig,
    agent: ureq::Agent,
}

impl ReceiptVerifier {
    /// Build a verifier for `verify_url`. Fails if the url is empty.
    pub fn new(shared_secret: &str, verify_url: &str) -> Result<Self, VerifyError> {
        let mut config = VerifierConfig::new(verify_url);
        if !shared_secret.is_empty() {
            config.shared_secret = Some(shared_secret.to_string());
        }
        Self::from_config(config)
    }

    pub fn from_config(config: VerifierConfig) -> Result<Self, VerifyError> {
        config.validate()?;
        let agent = build_agent(&config);
        Ok(Self { config, agent })
    }

    /// Use a caller-configured agent, e.g. with custom TLS or proxy settings.
    /// `timeout` in `config` is ignored; configure it on the agent instead.
    pub fn with_agent(config: VerifierConfig, agent: ureq::Agent) -> Result<Self, VerifyError> {
        config.validate()?;
        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify `receipt` against the configured endpoint.
    ///
    /// Returns the decoded response only when its status is 0. Every other
    /// outcome, including a well-formed rejection, is an error. Nothing is
    /// retried here.
    pub fn verify(&self, receipt: &str) -> Result<VerifyResponse, VerifyError> {
        let request = self.build_verify_request(receipt)?;
        debug!(url = %request.url, receipt_len = receipt.len(), "posting verify request");

        let result = self
            .execute(request)
            .and_then(|response| self.parse_verify_response(response));
        match &result {
            Ok(response) => info!(environment = %response.environment, "receipt verified"),
            Err(err) => warn!(
                error = %err,
                retryable = err.is_retryable(),
                "receipt verification failed"
            ),
        }
        result
    }

    pub fn build_verify_request(&self, receipt: &str) -> Result<HttpRequest, VerifyError> {
        let payload = VerifyRequest {
            receipt_data: receipt.to_string(),
            password: self.config.shared_secret.clone().unwrap_or_default(),
            exclude_old_transactions: self.config.exclude_old_transactions,
        };
        let body =
            serde_json::to_string(&payload).map_err(|e| VerifyError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: self.config.verify_url.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Decode an endpoint response. The HTTP status is checked before the
    /// body is looked at.
    pub fn parse_verify_response(
        &self,
        response: HttpResponse,
    ) -> Result<VerifyResponse, VerifyError> {
        check_status(response.status)?;
        let decoded: VerifyResponse = serde_json::from_str(&response.body)
            .map_err(|e| VerifyError::Deserialization(e.to_string()))?;

        let status = decoded.status_code();
        if status.is_ok() {
            return Ok(decoded);
        }
        Err(VerifyError::Status {
            status,
            environment: decoded.environment,
            is_retryable: decoded.is_retryable,
        })
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, VerifyError> {
        let mut builder = self.agent.post(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = match builder.send(request.body.as_bytes()) {
            Ok(response) => response,
            // Agents supplied through `with_agent` may still treat 4xx/5xx as errors.
            Err(ureq::Error::StatusCode(status)) => return Err(VerifyError::HttpStatus { status }),
            Err(source) => {
                return Err(VerifyError::Transport {
                    url: request.url,
                    source,
                })
            }
        };

        let status = response.status().as_u16();
        check_status(status)?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(VerifyError::BodyRead)?;
        debug!(status, body_len = body.len(), "verify response received");

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

impl fmt::Debug for ReceiptVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptVerifier")
            .field("verify_url", &self.config.verify_url)
            .field("has_shared_secret", &self.config.shared_secret.is_some())
            .finish_non_exhaustive()
    }
}

fn build_agent(config: &VerifierConfig) -> ureq::Agent {
    let mut builder = ureq::Agent::config_builder().http_status_as_error(false);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout_global(Some(timeout));
    }
    builder.build().new_agent()
}

fn check_status(status: u16) -> Result<(), VerifyError> {
    if status == 200 {
        return Ok(());
    }
    Err(VerifyError::HttpStatus { status })
}
