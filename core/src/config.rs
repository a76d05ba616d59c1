//! Verifier configuration and the well-known endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

pub const PRODUCTION_VERIFY_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub const SANDBOX_VERIFY_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

const ENV_VERIFY_URL: &str = "RECEIPT_VERIFY_URL";
const ENV_SHARED_SECRET: &str = "RECEIPT_SHARED_SECRET";
const ENV_TIMEOUT_SECS: &str = "RECEIPT_VERIFY_TIMEOUT_SECS";

/// Which of the two verification endpoints to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    pub fn verify_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_VERIFY_URL,
            Environment::Sandbox => SANDBOX_VERIFY_URL,
        }
    }
}

/// Immutable settings for a `ReceiptVerifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub verify_url: String,
    #[serde(default)]
    pub shared_secret: Option<String>,
    #[serde(default)]
    pub exclude_old_transactions: Option<bool>,
    /// Overall deadline per call. `None` keeps the transport default.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl VerifierConfig {
    pub fn new(verify_url: impl Into<String>) -> Self {
        Self {
            verify_url: verify_url.into(),
            shared_secret: None,
            exclude_old_transactions: None,
            timeout: None,
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.verify_url())
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    pub fn with_exclude_old_transactions(mut self, exclude: bool) -> Self {
        self.exclude_old_transactions = Some(exclude);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `RECEIPT_VERIFY_URL`, `RECEIPT_SHARED_SECRET` and
    /// `RECEIPT_VERIFY_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, VerifyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VerifyError> {
        let verify_url = lookup(ENV_VERIFY_URL)
            .ok_or_else(|| VerifyError::InvalidConfig(format!("{ENV_VERIFY_URL} is not set")))?;
        let mut config = Self::new(verify_url);
        config.shared_secret = lookup(ENV_SHARED_SECRET).filter(|s| !s.is_empty());
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                VerifyError::InvalidConfig(format!("{ENV_TIMEOUT_SECS} is not a number: {raw}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no request could be sent with.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.verify_url.trim().is_empty() {
            return Err(VerifyError::InvalidConfig("verify url is empty".to_string()));
        }
        Ok(())
    }
}
