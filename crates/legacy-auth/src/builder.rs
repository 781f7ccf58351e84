//! Redeemable payload builder
//!
//! Accumulates the session and app-credential fields, then validates on
//! `build()`. A stored session missing its token pair parses fine — it is a
//! "null-able corrupt" structure the service will never accept — and only
//! fails here, where the caller can distinguish data quality from deployment
//! defects.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::payload::RedeemablePayload;

/// Stored session blob, as written by the legacy SDK's login flow.
///
/// Nested shape (unknown keys such as `auth_type`/`created_at` are ignored):
/// `{ "id", "phone_number", "email": { "address", "is_verified" },
///    "auth_token": { "auth_token": { "token", "secret" } } }`
#[derive(Debug, Deserialize)]
struct SessionBlob {
    id: Option<i64>,
    phone_number: Option<String>,
    email: Option<EmailSection>,
    auth_token: Option<TokenSection>,
}

#[derive(Debug, Deserialize)]
struct EmailSection {
    address: Option<String>,
    is_verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct TokenSection {
    auth_token: Option<TokenPair>,
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    token: Option<String>,
    secret: Option<String>,
}

/// Builder for [`RedeemablePayload`]. Mutable until `build()`.
#[derive(Debug, Default, Clone)]
pub struct RedeemablePayloadBuilder {
    id: Option<i64>,
    phone_number: Option<String>,
    email_address: Option<String>,
    is_email_verified: Option<bool>,
    auth_token: Option<String>,
    auth_token_secret: Option<String>,
    app_consumer_key: Option<String>,
    app_consumer_secret: Option<String>,
    vendor_api_key: Option<String>,
}

impl RedeemablePayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored session blob into a builder.
    ///
    /// Tolerates absent fields anywhere in the nested shape, including the
    /// token pair itself; a structural mismatch (not JSON, not an object, a
    /// field of the wrong type) is `MalformedSession`. Callers decide the
    /// cleanup policy for that case — this function never swallows it.
    pub fn from_session_json(json: &str) -> Result<Self> {
        let blob: SessionBlob = serde_json::from_str(json)
            .map_err(|e| Error::MalformedSession(e.to_string()))?;

        let mut builder = Self::new();
        builder.id = blob.id;
        builder.phone_number = blob.phone_number;
        if let Some(email) = blob.email {
            builder.email_address = email.address;
            builder.is_email_verified = email.is_verified;
        }
        if let Some(pair) = blob.auth_token.and_then(|t| t.auth_token) {
            builder.auth_token = pair.token;
            builder.auth_token_secret = pair.secret;
        }
        Ok(builder)
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn email_address(mut self, email_address: impl Into<String>) -> Self {
        self.email_address = Some(email_address.into());
        self
    }

    pub fn is_email_verified(mut self, verified: bool) -> Self {
        self.is_email_verified = Some(verified);
        self
    }

    /// OAuth1a token issued to the user by the legacy service
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    /// OAuth1a secret issued to the user by the legacy service
    pub fn auth_token_secret(mut self, auth_token_secret: impl Into<String>) -> Self {
        self.auth_token_secret = Some(auth_token_secret.into());
        self
    }

    pub fn app_consumer_key(mut self, app_consumer_key: impl Into<String>) -> Self {
        self.app_consumer_key = Some(app_consumer_key.into());
        self
    }

    pub fn app_consumer_secret(mut self, app_consumer_secret: impl Into<String>) -> Self {
        self.app_consumer_secret = Some(app_consumer_secret.into());
        self
    }

    pub fn vendor_api_key(mut self, vendor_api_key: impl Into<String>) -> Self {
        self.vendor_api_key = Some(vendor_api_key.into());
        self
    }

    /// Validate and produce the payload.
    ///
    /// Checks run in a fixed order and fail on the first violation: token,
    /// token secret, consumer key, consumer secret, then API key shape.
    pub fn build(self) -> Result<RedeemablePayload> {
        let auth_token = require(self.auth_token, "auth_token")?;
        let auth_token_secret = require(self.auth_token_secret, "auth_token_secret")?;
        let app_consumer_key = require(self.app_consumer_key, "app_consumer_key")?;
        let app_consumer_secret = require(self.app_consumer_secret, "app_consumer_secret")?;
        let fabric_api_key = require(self.vendor_api_key, "fabric_api_key")?;

        if !is_valid_api_key_format(&fabric_api_key) {
            return Err(Error::InvalidApiKeyFormat);
        }

        Ok(RedeemablePayload {
            id: self.id,
            phone_number: self.phone_number,
            email_address: self.email_address,
            is_email_verified: self.is_email_verified,
            auth_token,
            auth_token_secret,
            app_consumer_key,
            app_consumer_secret,
            fabric_api_key,
        })
    }
}

fn require(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingField(field)),
    }
}

/// Exactly 40 characters, each in `[0-9a-f]`.
fn is_valid_api_key_format(api_key: &str) -> bool {
    api_key.len() == 40
        && api_key
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
