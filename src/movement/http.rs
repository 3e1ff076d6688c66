//! HTTP Movement Ledger
//!
//! Calls a remote movement API over JSON/HTTP:
//!
//! ```text
//! POST {base_url}/v1/accounts/movements
//! Authorization: Bearer <credential>
//! X-Idempotency-Key: <request_token>
//! {"accountNumber": 1, "amount": "10.00", "kind": "D"}
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::ledger::{LedgerFault, MovementLedger};
use super::types::{MoveOutcome, MovementKind, MovementRequest};
use crate::account::AccountNumber;
use crate::config::MovementApiConfig;
use crate::money::Amount;

pub const MOVEMENTS_PATH: &str = "/v1/accounts/movements";
pub const REQUEST_TOKEN_HEADER: &str = "X-Idempotency-Key";

pub struct HttpMovementLedger {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMovementLedger {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LedgerFault> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerFault::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), MOVEMENTS_PATH),
        })
    }

    pub fn from_config(config: &MovementApiConfig) -> Result<Self, LedgerFault> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify(err: reqwest::Error) -> LedgerFault {
    if err.is_timeout() {
        LedgerFault::Timeout
    } else if err.is_connect() || err.is_request() {
        LedgerFault::Transport(err.to_string())
    } else {
        LedgerFault::Protocol(err.to_string())
    }
}

#[async_trait]
impl MovementLedger for HttpMovementLedger {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn move_funds(
        &self,
        account: AccountNumber,
        amount: Amount,
        kind: MovementKind,
        credential: &str,
        request_token: &str,
    ) -> Result<MoveOutcome, LedgerFault> {
        let body = MovementRequest {
            account_number: account,
            amount,
            kind,
        };

        debug!(
            account = account,
            amount = %amount,
            kind = %kind,
            request_token = %request_token,
            "Calling movement API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .header(REQUEST_TOKEN_HEADER, request_token)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let text = response.text().await.map_err(classify)?;

        if status.is_success() {
            Ok(MoveOutcome {
                successful: true,
                status_code: status.as_u16(),
                body: text,
            })
        } else {
            warn!(
                account = account,
                kind = %kind,
                status = status.as_u16(),
                body = %text,
                "Movement API rejected movement"
            );
            Ok(MoveOutcome::rejected(status.as_u16(), text))
        }
    }
}
