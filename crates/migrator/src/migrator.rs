//! Migration state machine
//!
//! Orchestrates discovery → build → exchange → cleanup for one attempt:
//! look for a live platform session, read and parse the stored legacy
//! session, fill in app credentials, encode the unsigned assertion, submit
//! it, then apply the cleanup policy to the stored session based on the
//! outcome. At most one outstanding exchange per call; two concurrent calls
//! proceed independently and may race on the store (last cleanup wins).

use std::sync::Arc;

use legacy_auth::constants::{
    VENDOR_API_KEY_KEY, VENDOR_CONSUMER_KEY_KEY, VENDOR_CONSUMER_SECRET_KEY,
};
use legacy_auth::{RedeemablePayloadBuilder, SessionStore, unsigned_assertion};
use provider::{AuthenticatedUser, ErrorClassification, ExchangeClient, IdentityClient};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Terminal outcome of one migration attempt, used for logging and the
/// `migrations_total` counter label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MigrationOutcome {
    /// A platform user was already signed in; exchange skipped
    ExistingUser,
    /// No stored legacy session
    NoSession,
    /// Stored blob failed schema parsing; treated as nothing to migrate
    CorruptSession,
    /// Exchange succeeded
    Exchanged,
    /// Exchange endpoint rejected the legacy credentials (400/403)
    Rejected,
    /// Transient exchange failure; stored session preserved for retry
    Failed,
}

impl MigrationOutcome {
    fn label(self) -> &'static str {
        match self {
            MigrationOutcome::ExistingUser => "existing_user",
            MigrationOutcome::NoSession => "no_session",
            MigrationOutcome::CorruptSession => "corrupt_session",
            MigrationOutcome::Exchanged => "exchanged",
            MigrationOutcome::Rejected => "rejected",
            MigrationOutcome::Failed => "failed",
        }
    }
}

fn record_outcome(outcome: MigrationOutcome) {
    metrics::counter!("migrations_total", "outcome" => outcome.label()).increment(1);
}

/// Policy knobs for the migrator.
#[derive(Debug, Clone, Default)]
pub struct MigratorOptions {
    /// Clear the stored legacy session on a permanent (400/403) rejection
    /// even when the caller passed `cleanup = false`. Off by default: the
    /// caller's flag is authoritative unless the deployment opts in.
    pub clear_on_permanent_rejection: bool,
}

/// One-shot credential migration helper.
///
/// Constructed with its three collaborators injected — no global registry;
/// the host composes and owns the instance's lifetime.
pub struct AuthMigrator {
    store: Arc<dyn SessionStore>,
    exchange: Arc<dyn ExchangeClient>,
    identity: Arc<dyn IdentityClient>,
    options: MigratorOptions,
}

impl AuthMigrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        exchange: Arc<dyn ExchangeClient>,
        identity: Arc<dyn IdentityClient>,
    ) -> Self {
        Self::with_options(store, exchange, identity, MigratorOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn SessionStore>,
        exchange: Arc<dyn ExchangeClient>,
        identity: Arc<dyn IdentityClient>,
        options: MigratorOptions,
    ) -> Self {
        Self {
            store,
            exchange,
            identity,
            options,
        }
    }

    /// Migrate the stored legacy session, making its user the current user
    /// on the identity platform.
    ///
    /// An already-signed-in platform user is never displaced: the stored
    /// session is (optionally) cleared and the existing user returned
    /// without touching the exchange endpoint. An absent or corrupt stored
    /// session resolves to `Ok(None)` — there was nothing to migrate.
    ///
    /// `cleanup_legacy_session` controls whether the stored session is
    /// deleted after the attempt. On a transient exchange failure the
    /// session is always preserved, regardless of the flag, so the caller
    /// can retry later.
    pub async fn migrate(
        &self,
        cleanup_legacy_session: bool,
    ) -> Result<Option<AuthenticatedUser>> {
        // A live platform session takes priority over everything else
        if let Some(user) = self.identity.current_user().await {
            info!(user_id = %user.user_id, "platform user already signed in, skipping exchange");
            if cleanup_legacy_session {
                self.clear().await;
            }
            record_outcome(MigrationOutcome::ExistingUser);
            return Ok(Some(user));
        }

        let Some(blob) = self.store.session_blob().await else {
            debug!("no legacy session stored, nothing to migrate");
            if cleanup_legacy_session {
                self.clear().await;
            }
            record_outcome(MigrationOutcome::NoSession);
            return Ok(None);
        };

        let builder = match RedeemablePayloadBuilder::from_session_json(&blob) {
            Ok(builder) => builder,
            Err(e) => {
                // Corrupt sessions are not caller-visible errors: the record
                // is unredeemable, so the result is the same as no session
                warn!(error = %e, "stored legacy session is corrupt, treating as absent");
                if cleanup_legacy_session {
                    self.clear().await;
                }
                record_outcome(MigrationOutcome::CorruptSession);
                return Ok(None);
            }
        };

        // Config defects from here on are deployment bugs and propagate
        let builder = self.augment_with_config(builder).await;
        let payload = builder.build()?;
        let assertion = unsigned_assertion(&payload);

        info!("submitting legacy session to exchange endpoint");
        match self.exchange.sign_in_with_assertion(&assertion).await {
            Ok(user) => {
                info!(user_id = %user.user_id, "exchange succeeded");
                if cleanup_legacy_session {
                    self.clear().await;
                }
                record_outcome(MigrationOutcome::Exchanged);
                Ok(Some(user))
            }
            Err(err) => {
                match err.classification() {
                    ErrorClassification::Permanent => {
                        // Invalid credentials should not linger, but the
                        // caller's opt-out is honored unless the deployment
                        // overrides it
                        warn!(error = %err, "legacy credentials rejected by exchange endpoint");
                        if cleanup_legacy_session || self.options.clear_on_permanent_rejection {
                            self.clear().await;
                        }
                        record_outcome(MigrationOutcome::Rejected);
                    }
                    ErrorClassification::Transient => {
                        // Preserve the session so a later attempt can retry
                        warn!(error = %err, "exchange failed transiently, preserving legacy session");
                        record_outcome(MigrationOutcome::Failed);
                    }
                }
                Err(err.into())
            }
        }
    }

    /// Exchange a caller-supplied builder directly.
    ///
    /// Skips session discovery and config augmentation entirely and applies
    /// no cleanup — this path serves callers holding out-of-band credentials
    /// (manual entry) rather than a previously persisted session.
    pub async fn migrate_with_builder(
        &self,
        builder: RedeemablePayloadBuilder,
    ) -> Result<Option<AuthenticatedUser>> {
        let payload = builder.build()?;
        let assertion = unsigned_assertion(&payload);

        info!("submitting caller-supplied credentials to exchange endpoint");
        let user = self.exchange.sign_in_with_assertion(&assertion).await?;
        record_outcome(MigrationOutcome::Exchanged);
        Ok(Some(user))
    }

    /// Whether a legacy session is currently stored.
    pub async fn has_legacy_auth(&self) -> bool {
        self.store.has_session().await
    }

    /// Delete the stored legacy session.
    pub async fn clear_legacy_auth(&self) {
        self.clear().await;
    }

    async fn augment_with_config(
        &self,
        mut builder: RedeemablePayloadBuilder,
    ) -> RedeemablePayloadBuilder {
        if let Some(key) = self.store.resolve_config_value(VENDOR_CONSUMER_KEY_KEY).await {
            builder = builder.app_consumer_key(key);
        }
        if let Some(secret) = self
            .store
            .resolve_config_value(VENDOR_CONSUMER_SECRET_KEY)
            .await
        {
            builder = builder.app_consumer_secret(secret);
        }
        if let Some(api_key) = self.store.resolve_config_value(VENDOR_API_KEY_KEY).await {
            builder = builder.vendor_api_key(api_key);
        }
        builder
    }

    async fn clear(&self) {
        self.store.clear_session().await;
        metrics::counter!("legacy_sessions_cleared_total").increment(1);
    }
}
