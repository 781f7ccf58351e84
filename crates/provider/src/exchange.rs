//! HTTP exchange client
//!
//! Reference `ExchangeClient` implementation: POSTs the unsigned assertion to
//! a custom-token exchange endpoint and maps the response onto
//! `AuthenticatedUser`. The endpoint validates the embedded legacy
//! credentials out-of-band — the assertion itself carries no signature, so a
//! non-success status is the server's verdict on the credentials, not on the
//! request shape.

use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

use crate::{AuthenticatedUser, ExchangeClient, ExchangeError, Result};

/// Response from the exchange endpoint on success.
///
/// `expires_in` is a delta in seconds from the response time; the migrator
/// does not persist platform tokens, so it is surfaced to the caller only
/// through `id_token`/`refresh_token` and otherwise ignored.
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    user_id: String,
    id_token: String,
    refresh_token: Option<String>,
    #[allow(dead_code)]
    expires_in: Option<u64>,
}

/// `ExchangeClient` backed by a reqwest POST to a configured endpoint.
pub struct HttpExchangeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExchangeClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn exchange(&self, assertion: &str) -> Result<AuthenticatedUser> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "assertion": assertion }))
            .send()
            .await
            .map_err(|e| ExchangeError::Http(format!("exchange request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ExchangeResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(format!("bad exchange body: {e}")))?;

        debug!(user_id = %parsed.user_id, "assertion exchange succeeded");
        Ok(AuthenticatedUser {
            user_id: parsed.user_id,
            id_token: Some(parsed.id_token),
            refresh_token: parsed.refresh_token,
        })
    }
}

impl ExchangeClient for HttpExchangeClient {
    fn sign_in_with_assertion<'a>(
        &'a self,
        assertion: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser>> + Send + 'a>> {
        Box::pin(self.exchange(assertion))
    }
}
