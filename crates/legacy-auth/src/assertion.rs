//! Unsigned assertion encoding
//!
//! Produces the three-segment, dot-joined token submitted to the exchange
//! endpoint: a fixed `{"alg":"none"}` header segment, the base64 of the
//! payload's canonical JSON, and an empty signature segment. The signature is
//! never produced — the endpoint independently validates the legacy
//! credentials embedded in the payload, so the assertion carries no
//! cryptographic self-verification at all.
//!
//! Pure function, no hidden state, no error path: a payload that somehow
//! fails to serialize encodes as an empty object rather than failing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::constants::UNSIGNED_ASSERTION_HEADER;
use crate::payload::RedeemablePayload;

/// Encode a payload as an unsigned assertion.
pub fn unsigned_assertion(payload: &RedeemablePayload) -> String {
    let json = serde_json::to_vec(payload).unwrap_or_else(|_| b"{}".to_vec());
    format!("{UNSIGNED_ASSERTION_HEADER}.{}.", STANDARD.encode(json))
}
