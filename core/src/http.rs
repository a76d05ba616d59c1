//! Plain-data HTTP types for callers that drive their own transport.
//!
//! # Design
//! `ReceiptVerifier::verify` performs the round-trip itself over a shared
//! ureq agent. Callers on an async runtime, or tests that want to simulate
//! the endpoint, can instead take the `HttpRequest` from
//! `build_verify_request`, execute it however they like, and hand the
//! resulting `HttpResponse` to `parse_verify_response`.

/// A verification request described as plain data. Always sent as a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
