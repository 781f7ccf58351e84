//! Error types for session parsing and payload construction

/// Errors from parsing a stored session or building a redeemable payload.
///
/// `MalformedSession` is a data-quality condition the migrator recovers from
/// (a corrupt blob means "nothing to migrate"); the other variants indicate
/// a deployment or caller defect and propagate fatally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed legacy session: {0}")]
    MalformedSession(String),

    #[error("required payload field missing or empty: {0}")]
    MissingField(&'static str),

    #[error("vendor API key must be exactly 40 lowercase hex characters")]
    InvalidApiKeyFormat,
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
