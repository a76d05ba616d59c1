//! Status codes returned in the `status` field of a verification response.
//!
//! # Design
//! The set of codes is closed, so `StatusCode` is a plain tagged enum. Codes
//! in the internal data-access band keep their exact value in `Internal`, and
//! anything unrecognised is preserved in `Unknown` so no information is lost
//! when an error is reported back to the caller.

use std::borrow::Cow;
use std::fmt;

/// First code of the internal data-access error band.
pub const INTERNAL_ERROR_MIN: i32 = 21100;
/// Last code of the internal data-access error band.
pub const INTERNAL_ERROR_MAX: i32 = 21199;

/// A decoded verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 0: the receipt is valid.
    Ok,
    /// 21000: the server could not read the JSON object that was sent.
    ErrorJson,
    /// 21002: `receipt-data` was malformed or missing.
    ErrorReceiptData,
    /// 21003: the receipt could not be authenticated.
    ErrorReceiptInvalid,
    /// 21004: the shared secret does not match the one on file.
    ErrorSharePassword,
    /// 21005: the receipt server is temporarily unavailable.
    ErrorServer,
    /// 21006: the receipt is valid but the subscription has expired.
    ErrorReceiptExpired,
    /// 21007: a sandbox receipt was sent to the production endpoint.
    ErrorReceiptSandbox,
    /// 21008: a production receipt was sent to the sandbox endpoint.
    ErrorReceiptProd,
    /// 21010: the receipt could not be authorized.
    ErrorReceiptNoAuth,
    /// 21100..=21199: internal data-access error.
    Internal(i32),
    Unknown(i32),
}

impl StatusCode {
    /// Numeric value as it appears on the wire.
    pub fn code(&self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::ErrorJson => 21000,
            StatusCode::ErrorReceiptData => 21002,
            StatusCode::ErrorReceiptInvalid => 21003,
            StatusCode::ErrorSharePassword => 21004,
            StatusCode::ErrorServer => 21005,
            StatusCode::ErrorReceiptExpired => 21006,
            StatusCode::ErrorReceiptSandbox => 21007,
            StatusCode::ErrorReceiptProd => 21008,
            StatusCode::ErrorReceiptNoAuth => 21010,
            StatusCode::Internal(code) | StatusCode::Unknown(code) => *code,
        }
    }

    /// Human-readable name. Only the internal band needs an allocation.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            StatusCode::Ok => Cow::Borrowed("Ok"),
            StatusCode::ErrorJson => Cow::Borrowed("ErrorJson"),
            StatusCode::ErrorReceiptData => Cow::Borrowed("ErrorReceiptData"),
            StatusCode::ErrorReceiptInvalid => Cow::Borrowed("ErrorReceiptInvalid"),
            StatusCode::ErrorSharePassword => Cow::Borrowed("ErrorSharePassword"),
            StatusCode::ErrorServer => Cow::Borrowed("ErrorServer"),
            StatusCode::ErrorReceiptExpired => Cow::Borrowed("ErrorReceiptExpired"),
            StatusCode::ErrorReceiptSandbox => Cow::Borrowed("ErrorReceiptSandbox"),
            StatusCode::ErrorReceiptProd => Cow::Borrowed("ErrorReceiptProd"),
            StatusCode::ErrorReceiptNoAuth => Cow::Borrowed("ErrorReceiptNoAuth"),
            StatusCode::Internal(code) => Cow::Owned(format!("ErrorInternal<{code}>")),
            StatusCode::Unknown(_) => Cow::Borrowed("unknown"),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            0 => StatusCode::Ok,
            21000 => StatusCode::ErrorJson,
            21002 => StatusCode::ErrorReceiptData,
            21003 => StatusCode::ErrorReceiptInvalid,
            21004 => StatusCode::ErrorSharePassword,
            21005 => StatusCode::ErrorServer,
            21006 => StatusCode::ErrorReceiptExpired,
            21007 => StatusCode::ErrorReceiptSandbox,
            21008 => StatusCode::ErrorReceiptProd,
            21010 => StatusCode::ErrorReceiptNoAuth,
            INTERNAL_ERROR_MIN..=INTERNAL_ERROR_MAX => StatusCode::Internal(code),
            other => StatusCode::Unknown(other),
        }
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Name of an arbitrary status code. Total over `i32`.
pub fn describe(code: i32) -> String {
    StatusCode::from(code).name().into_owned()
}
