//! Error types for migration operations

/// Errors surfaced by a migration attempt.
///
/// A corrupt stored session is never one of these — the migrator treats it
/// as "nothing to migrate" and resolves successfully with no user. What does
/// surface: payload construction defects (deployment misconfiguration or a
/// bad caller-supplied builder) and exchange failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("payload construction failed: {0}")]
    Session(#[from] legacy_auth::Error),

    #[error("assertion exchange failed: {0}")]
    Exchange(#[from] provider::ExchangeError),
}

/// Result alias for migration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_session_errors() {
        let err: Error = legacy_auth::Error::MissingField("auth_token").into();
        assert!(err.to_string().contains("auth_token"), "got: {err}");
    }

    #[test]
    fn wraps_exchange_errors_with_status() {
        let err: Error = provider::ExchangeError::Rejected {
            status: 403,
            message: "forbidden".into(),
        }
        .into();
        assert!(err.to_string().contains("403"), "got: {err}");
    }
}
