//! Legacy session migrator
//!
//! The single public operation this workspace exists to provide: exchange a
//! stored legacy phone-auth session for a user on the new identity platform.
//!
//! Migration flow:
//! 1. `AuthMigrator::migrate(cleanup)` checks for a live platform session
//! 2. Otherwise reads the stored blob via the injected `SessionStore`
//! 3. Parses it into a `RedeemablePayloadBuilder`, fills in app credentials
//! 4. Encodes the unsigned assertion and submits it via `ExchangeClient`
//! 5. Applies the cleanup policy to the stored session based on the outcome
//!
//! `migrate_with_builder` is the explicit variant for caller-held
//! credentials; `has_legacy_auth`/`clear_legacy_auth` expose the store.

pub mod error;
pub mod migrator;

pub use error::{Error, Result};
pub use migrator::{AuthMigrator, MigratorOptions};
