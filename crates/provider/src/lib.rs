//! Identity-platform collaborator seam
//!
//! Defines the two external collaborators the migrator is constructed with:
//! the identity client (is a user already signed in?) and the exchange client
//! (redeem an unsigned assertion for a signed-in user). The migrator never
//! talks to the platform directly — it only sees these traits, which keeps the
//! core testable with in-memory doubles and keeps the platform's own
//! authentication protocol out of scope.
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
//! (`Arc<dyn ExchangeClient>`).

pub mod exchange;

pub use exchange::HttpExchangeClient;

use std::future::Future;
use std::pin::Pin;

/// A signed-in user as reported by the identity platform.
///
/// Produced either by a successful assertion exchange or by the identity
/// client when a user was already signed in before migration ran (in which
/// case the token fields are absent — the existing session is left untouched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    /// Short-lived platform token minted by the exchange endpoint
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl AuthenticatedUser {
    /// User known only by id — the shape the identity client reports for an
    /// already-active session.
    pub fn existing(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            id_token: None,
            refresh_token: None,
        }
    }
}

/// Classification of exchange failures to drive the cleanup policy.
///
/// Permanent means the legacy credentials themselves were rejected and a
/// retry with the same session cannot succeed; Transient covers everything
/// else (network, server-internal) and must leave the stored session alone
/// so the caller can retry later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    Permanent,
    Transient,
}

/// Errors from the assertion exchange.
///
/// `Rejected` carries the endpoint's HTTP status explicitly so callers match
/// on it structurally instead of inspecting error types or strings.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("exchange endpoint rejected the assertion ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("invalid exchange response: {0}")]
    InvalidResponse(String),
}

impl ExchangeError {
    /// Permanent iff the endpoint reported the legacy credentials invalid
    /// (bad request / forbidden). Everything else is retryable.
    pub fn classification(&self) -> ErrorClassification {
        match self {
            ExchangeError::Rejected {
                status: 400 | 403, ..
            } => ErrorClassification::Permanent,
            _ => ErrorClassification::Transient,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.classification() == ErrorClassification::Permanent
    }
}

/// Result alias for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Query for an already-active session on the identity platform.
///
/// The real implementation wraps the platform SDK's current-user accessor;
/// it is injected by the host and out of scope here.
pub trait IdentityClient: Send + Sync {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Pin<Box<dyn Future<Output = Option<AuthenticatedUser>> + Send + '_>>;
}

/// `IdentityClient` for hosts that integrate only the exchange endpoint and
/// have no platform SDK in-process: reports that nobody is signed in, so
/// migration always proceeds to the exchange.
pub struct NoActiveSession;

impl IdentityClient for NoActiveSession {
    fn current_user(&self) -> Pin<Box<dyn Future<Output = Option<AuthenticatedUser>> + Send + '_>> {
        Box::pin(async { None })
    }
}

/// The "sign in with assertion" primitive.
///
/// Single-shot: the returned future resolves exactly once with success or
/// failure. No timeout or cancellation is provided here — a caller wanting a
/// timeout wraps the future externally.
pub trait ExchangeClient: Send + Sync {
    fn sign_in_with_assertion<'a>(
        &'a self,
        assertion: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_400_is_permanent() {
        let err = ExchangeError::Rejected {
            status: 400,
            message: "invalid legacy credentials".into(),
        };
        assert_eq!(err.classification(), ErrorClassification::Permanent);
        assert!(err.is_permanent());
    }

    #[test]
    fn rejected_403_is_permanent() {
        let err = ExchangeError::Rejected {
            status: 403,
            message: "forbidden".into(),
        };
        assert!(err.is_permanent());
    }

    #[test]
    fn rejected_other_statuses_are_transient() {
        for status in [401, 429, 500, 503] {
            let err = ExchangeError::Rejected {
                status,
                message: "nope".into(),
            };
            assert_eq!(
                err.classification(),
                ErrorClassification::Transient,
                "status {status} must be transient"
            );
        }
    }

    #[test]
    fn transport_and_parse_errors_are_transient() {
        assert!(!ExchangeError::Http("connection refused".into()).is_permanent());
        assert!(!ExchangeError::InvalidResponse("not json".into()).is_permanent());
    }

    #[test]
    fn rejected_display_includes_status_and_message() {
        let err = ExchangeError::Rejected {
            status: 403,
            message: "token revoked".into(),
        };
        let text = err.to_string();
        assert!(text.contains("403"), "got: {text}");
        assert!(text.contains("token revoked"), "got: {text}");
    }

    #[tokio::test]
    async fn no_active_session_reports_nobody() {
        assert!(NoActiveSession.current_user().await.is_none());
    }

    #[test]
    fn existing_user_has_no_tokens() {
        let user = AuthenticatedUser::existing("uid-1");
        assert_eq!(user.user_id, "uid-1");
        assert!(user.id_token.is_none());
        assert!(user.refresh_token.is_none());
    }
}
