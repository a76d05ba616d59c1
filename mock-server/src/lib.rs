use std::{collections::HashMap, str::FromStr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const STATUS_OK: i32 = 0;
pub const STATUS_BAD_JSON: i32 = 21000;
pub const STATUS_BAD_RECEIPT_DATA: i32 = 21002;
pub const STATUS_NOT_AUTHENTICATED: i32 = 21003;
pub const STATUS_SECRET_MISMATCH: i32 = 21004;
pub const STATUS_EXPIRED: i32 = 21006;
pub const STATUS_SANDBOX_RECEIPT: i32 = 21007;
pub const STATUS_PRODUCTION_RECEIPT: i32 = 21008;
pub const STATUS_NOT_AUTHORIZED: i32 = 21010;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::Sandbox => "Sandbox",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptState {
    Active,
    Expired,
    NoAuth,
}

impl FromStr for ReceiptState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(ReceiptState::Active),
            "expired" => Ok(ReceiptState::Expired),
            "noauth" => Ok(ReceiptState::NoAuth),
            other => Err(format!("unknown receipt state: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
struct Receipt {
    issued_in: Environment,
    state: ReceiptState,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(rename = "receipt-data", default)]
    pub receipt_data: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub environment: String,
    #[serde(rename = "is-retryable")]
    pub is_retryable: bool,
    pub status: i32,
}

/// In-memory stand-in for the receipt verification service.
#[derive(Clone, Debug)]
pub struct MockAppStore {
    environment: Environment,
    shared_secret: Option<String>,
    receipts: HashMap<String, Receipt>,
    forced_failure: Option<StatusCode>,
}

impl MockAppStore {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            shared_secret: None,
            receipts: HashMap::new(),
            forced_failure: None,
        }
    }

    pub fn with_shared_secret(mut self, secret: &str) -> Self {
        self.shared_secret = Some(secret.to_string());
        self
    }

    pub fn with_receipt(
        mut self,
        receipt_data: &str,
        issued_in: Environment,
        state: ReceiptState,
    ) -> Self {
        self.receipts
            .insert(receipt_data.to_string(), Receipt { issued_in, state });
        self
    }

    /// Register receipts from a comma-separated list of
    /// `receipt-data:Environment:State` entries, e.g.
    /// `QUJDRA==:Sandbox:Active,RVhQ:Production:Expired`.
    pub fn with_receipt_list(mut self, list: &str) -> Result<Self, String> {
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let (Some(data), Some(environment), Some(state)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(format!("expected receipt-data:Environment:State, got {entry}"));
            };
            self = self.with_receipt(data, environment.parse()?, state.parse()?);
        }
        Ok(self)
    }

    /// Answer every request with HTTP `status` and no JSON body.
    pub fn with_http_failure(mut self, status: u16) -> Self {
        self.forced_failure =
            Some(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
        self
    }

    fn evaluate(&self, body: &str) -> i32 {
        let request: VerifyRequest = match serde_json::from_str(body) {
            Ok(request) => request,
            Err(_) => return STATUS_BAD_JSON,
        };
        let receipt_data = match request.receipt_data.as_deref() {
            Some(data) if !data.is_empty() && STANDARD.decode(data).is_ok() => data,
            _ => return STATUS_BAD_RECEIPT_DATA,
        };
        if let Some(expected) = &self.shared_secret {
            if request.password.as_deref() != Some(expected.as_str()) {
                return STATUS_SECRET_MISMATCH;
            }
        }
        let Some(receipt) = self.receipts.get(receipt_data) else {
            return STATUS_NOT_AUTHENTICATED;
        };
        match (receipt.issued_in, self.environment) {
            (Environment::Sandbox, Environment::Production) => return STATUS_SANDBOX_RECEIPT,
            (Environment::Production, Environment::Sandbox) => return STATUS_PRODUCTION_RECEIPT,
            _ => {}
        }
        match receipt.state {
            ReceiptState::Active => STATUS_OK,
            ReceiptState::Expired => STATUS_EXPIRED,
            ReceiptState::NoAuth => STATUS_NOT_AUTHORIZED,
        }
    }
}

pub type Store = Arc<MockAppStore>;

pub fn app(store: MockAppStore) -> Router {
    let store: Store = Arc::new(store);
    Router::new()
        .route("/verifyReceipt", post(verify_receipt))
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: MockAppStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

// Body is taken as a raw string so malformed JSON becomes status 21000
// instead of an extractor rejection.
async fn verify_receipt(
    State(store): State<Store>,
    body: String,
) -> Result<Json<VerifyResponse>, StatusCode> {
    if let Some(status) = store.forced_failure {
        return Err(status);
    }
    let status = store.evaluate(&body);
    debug!(status, "verifyReceipt");
    Ok(Json(VerifyResponse {
        environment: store.environment.as_str().to_string(),
        is_retryable: false,
        status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIPT: &str = "TUlJYldRWUpLb1pJaHZjTkFRY0M=";

    fn store() -> MockAppStore {
        MockAppStore::new(Environment::Production)
            .with_shared_secret("secret123")
            .with_receipt(RECEIPT, Environment::Production, ReceiptState::Active)
    }

    fn body(receipt: &str, password: &str) -> String {
        serde_json::json!({ "receipt-data": receipt, "password": password }).to_string()
    }

    #[test]
    fn active_receipt_is_ok() {
        assert_eq!(store().evaluate(&body(RECEIPT, "secret123")), STATUS_OK);
    }

    #[test]
    fn malformed_json_is_21000() {
        assert_eq!(store().evaluate("{not json"), STATUS_BAD_JSON);
    }

    #[test]
    fn missing_or_invalid_receipt_data_is_21002() {
        let s = store();
        assert_eq!(s.evaluate(r#"{"password":"secret123"}"#), STATUS_BAD_RECEIPT_DATA);
        assert_eq!(s.evaluate(&body("", "secret123")), STATUS_BAD_RECEIPT_DATA);
        assert_eq!(s.evaluate(&body("!!not base64!!", "secret123")), STATUS_BAD_RECEIPT_DATA);
    }

    #[test]
    fn wrong_secret_is_21004() {
        assert_eq!(store().evaluate(&body(RECEIPT, "nope")), STATUS_SECRET_MISMATCH);
    }

    #[test]
    fn secret_not_checked_when_unset() {
        let s = MockAppStore::new(Environment::Production).with_receipt(
            RECEIPT,
            Environment::Production,
            ReceiptState::Active,
        );
        assert_eq!(s.evaluate(&body(RECEIPT, "")), STATUS_OK);
    }

    #[test]
    fn unknown_receipt_is_21003() {
        assert_eq!(store().evaluate(&body("QUJDRA==", "secret123")), STATUS_NOT_AUTHENTICATED);
    }

    #[test]
    fn environment_mismatch_redirects() {
        let production =
            store().with_receipt("U0FOREJPWA==", Environment::Sandbox, ReceiptState::Active);
        assert_eq!(
            production.evaluate(&body("U0FOREJPWA==", "secret123")),
            STATUS_SANDBOX_RECEIPT
        );

        let sandbox = MockAppStore::new(Environment::Sandbox).with_receipt(
            RECEIPT,
            Environment::Production,
            ReceiptState::Active,
        );
        assert_eq!(sandbox.evaluate(&body(RECEIPT, "")), STATUS_PRODUCTION_RECEIPT);
    }

    #[test]
    fn receipt_states_map_to_statuses() {
        let s = store()
            .with_receipt("RVhQ", Environment::Production, ReceiptState::Expired)
            .with_receipt("Tk9BVVRI", Environment::Production, ReceiptState::NoAuth);
        assert_eq!(s.evaluate(&body("RVhQ", "secret123")), STATUS_EXPIRED);
        assert_eq!(s.evaluate(&body("Tk9BVVRI", "secret123")), STATUS_NOT_AUTHORIZED);
    }

    #[test]
    fn receipt_list_registers_every_entry() {
        let s = MockAppStore::new(Environment::Production)
            .with_receipt_list(&format!(
                "{RECEIPT}:Production:Active, U0FOREJPWA==:sandbox:active,RVhQ:Production:Expired,"
            ))
            .unwrap();
        assert_eq!(s.evaluate(&body(RECEIPT, "")), STATUS_OK);
        assert_eq!(s.evaluate(&body("U0FOREJPWA==", "")), STATUS_SANDBOX_RECEIPT);
        assert_eq!(s.evaluate(&body("RVhQ", "")), STATUS_EXPIRED);
    }

    #[test]
    fn receipt_list_rejects_malformed_entries() {
        let s = MockAppStore::new(Environment::Production);
        assert!(s.clone().with_receipt_list("QUJDRA==:Production").is_err());
        assert!(s.clone().with_receipt_list("QUJDRA==:Staging:Active").is_err());
        assert!(s.with_receipt_list("QUJDRA==:Sandbox:Refunded").is_err());
    }

    #[test]
    fn response_serializes_with_wire_names() {
        let response = VerifyResponse {
            environment: "Sandbox".to_string(),
            is_retryable: false,
            status: 21007,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "environment": "Sandbox", "is-retryable": false, "status": 21007 })
        );
    }
}
