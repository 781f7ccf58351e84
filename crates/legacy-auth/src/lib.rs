//! Legacy phone-auth session handling
//!
//! Everything needed to turn a stored legacy SDK session into a redeemable
//! unsigned assertion. This crate is a standalone library with no dependency
//! on the migrator — it can be tested and used independently.
//!
//! Redemption flow:
//! 1. The legacy login flow (out of scope) persists a session blob via
//!    `storage::FileSessionStore::set_session_blob()`
//! 2. Migration parses it with `RedeemablePayloadBuilder::from_session_json()`
//! 3. App credentials resolved via `SessionStore::resolve_config_value()`
//!    fill in the consumer key/secret and vendor API key
//! 4. `RedeemablePayloadBuilder::build()` validates and produces the payload
//! 5. `assertion::unsigned_assertion()` encodes it for the exchange endpoint
//! 6. On a terminal outcome the migrator calls `SessionStore::clear_session()`

pub mod assertion;
pub mod builder;
pub mod constants;
pub mod error;
pub mod payload;
pub mod storage;

pub use assertion::unsigned_assertion;
pub use builder::RedeemablePayloadBuilder;
pub use constants::*;
pub use error::{Error, Result};
pub use payload::RedeemablePayload;
pub use storage::{FileSessionStore, SessionStore};
