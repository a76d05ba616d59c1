//! Verify one receipt from the command line.
//!
//! ```text
//! RECEIPT_VERIFY_URL=https://sandbox.itunes.apple.com/verifyReceipt \
//! RECEIPT_SHARED_SECRET=... cargo run --example verify -- <base64 receipt>
//! ```

use std::process::ExitCode;

use receipt_verifier::{ReceiptVerifier, VerifierConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();

    let Some(receipt) = std::env::args().nth(1) else {
        eprintln!("usage: verify <base64 receipt>");
        return ExitCode::FAILURE;
    };

    let verifier = match VerifierConfig::from_env().and_then(ReceiptVerifier::from_config) {
        Ok(verifier) => verifier,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match verifier.verify(&receipt) {
        Ok(response) => {
            println!("receipt verified ({})", response.environment);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("receipt verify error: {err} (retryable: {})", err.is_retryable());
            ExitCode::FAILURE
        }
    }
}
