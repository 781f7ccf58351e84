//! The redeemable payload value object
//!
//! Immutable once built; exists only to be serialized into the assertion's
//! middle segment. Field order here IS the canonical wire order — serde
//! serializes struct fields in declaration order, and the exchange endpoint's
//! schema is written against that order.

use serde::Serialize;

/// Flattened legacy session plus app credentials, ready for encoding.
///
/// All nine keys are always present on the wire. Optional fields that were
/// never collected serialize as explicit `null` — consumers must be able to
/// tell "not collected" from "empty string", so absence is never elided.
/// Construct via [`crate::RedeemablePayloadBuilder`]; the builder guarantees
/// the required fields are non-empty and the API key shape is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedeemablePayload {
    pub id: Option<i64>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub is_email_verified: Option<bool>,
    pub auth_token: String,
    pub auth_token_secret: String,
    pub app_consumer_key: String,
    pub app_consumer_secret: String,
    pub fabric_api_key: String,
}
