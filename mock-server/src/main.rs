use std::io;

use mock_app_store::{Environment, MockAppStore, ReceiptState};
use tokio::net::TcpListener;
use tracing::info;

// Registered when MOCK_RECEIPTS is unset so a bare run can still answer 0.
const DEMO_RECEIPT: &str = "TUlJYldRWUpLb1pJaHZjTkFRY0M=";

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    tracing_subscriber::fmt().init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let environment = std::env::var("MOCK_ENVIRONMENT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(Environment::Production);

    let mut store = MockAppStore::new(environment);
    if let Ok(secret) = std::env::var("MOCK_SHARED_SECRET") {
        store = store.with_shared_secret(&secret);
    }
    store = match std::env::var("MOCK_RECEIPTS") {
        Ok(list) => store
            .with_receipt_list(&list)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        Err(_) => store.with_receipt(DEMO_RECEIPT, environment, ReceiptState::Active),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, ?environment, "listening");
    mock_app_store::run(listener, store).await
}
