//! Legacy session storage
//!
//! One named slot holding the serialized session string the legacy SDK's
//! login flow left behind, plus lookup of the app credentials from a
//! manifest-like metadata file. Nothing here is fatal: every operation
//! degrades to "absent" on any underlying storage error, because a missing
//! or unreadable session simply means there is nothing to migrate.
//!
//! The file implementation replaces the record wholesale (atomic temp-file +
//! rename) and never mutates it in place. A tokio Mutex serializes writers
//! within the process; cross-call read/clear interleaving from concurrent
//! migrations is an accepted race (last cleanup wins).

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Store of the single persisted legacy session and the deployment's
/// app-credential metadata.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn SessionStore>`).
pub trait SessionStore: Send + Sync {
    /// The current persisted session string, or absent if none is stored,
    /// the stored value is empty, or the store is inaccessible.
    fn session_blob(&self) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>>;

    /// True iff `session_blob()` would return a value.
    fn has_session(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;

    /// Delete the persisted session. Idempotent; absent is not an error.
    fn clear_session(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Look up a named value from the deployment's metadata source.
    /// Absent (with a warning logged) if the source is unreadable or the
    /// key is missing or empty.
    fn resolve_config_value<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
}

/// Manifest metadata file shape: a `[metadata]` table of string values.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    metadata: std::collections::HashMap<String, String>,
}

/// File-backed [`SessionStore`].
///
/// The session lives in its own file (the whole file is the blob); the
/// metadata lives in a TOML manifest maintained by the deployment. The
/// manifest is re-read per lookup — migration is one-shot and the file is
/// the source of truth, not a cache.
pub struct FileSessionStore {
    session_path: PathBuf,
    manifest_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(session_path: PathBuf, manifest_path: PathBuf) -> Self {
        Self {
            session_path,
            manifest_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Persist a session blob, replacing any existing record.
    ///
    /// This is the seam the (out of scope) legacy login flow writes through;
    /// the demo binary and tests use it for seeding. Atomic write (temp file
    /// + rename) with 0600 permissions — the blob contains an OAuth1a secret.
    pub async fn set_session_blob(&self, blob: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;

        let dir = self.session_path.parent().ok_or_else(|| {
            std::io::Error::other("session path has no parent directory")
        })?;
        let tmp_path = dir.join(format!(".session.tmp.{}", std::process::id()));

        tokio::fs::write(&tmp_path, blob.as_bytes()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&tmp_path, perms).await?;
        }

        tokio::fs::rename(&tmp_path, &self.session_path).await?;
        debug!(path = %self.session_path.display(), "persisted legacy session");
        Ok(())
    }

    async fn read_blob(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.session_path).await {
            Ok(blob) if blob.is_empty() => None,
            Ok(blob) => Some(blob),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.session_path.display(), error = %e, "session store unreadable");
                None
            }
        }
    }

    async fn remove_blob(&self) {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.session_path).await {
            Ok(()) => debug!(path = %self.session_path.display(), "cleared legacy session"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.session_path.display(), error = %e, "failed to clear legacy session");
            }
        }
    }

    async fn lookup_metadata(&self, key: &str) -> Option<String> {
        let contents = match tokio::fs::read_to_string(&self.manifest_path).await {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %self.manifest_path.display(), error = %e, "manifest unreadable");
                return None;
            }
        };
        let manifest: Manifest = match toml::from_str(&contents) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %self.manifest_path.display(), error = %e, "manifest not valid TOML");
                return None;
            }
        };
        match manifest.metadata.get(key) {
            Some(value) if !value.is_empty() => Some(value.clone()),
            _ => {
                warn!(key, path = %self.manifest_path.display(), "metadata key not found in manifest");
                None
            }
        }
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

impl SessionStore for FileSessionStore {
    fn session_blob(&self) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>> {
        Box::pin(self.read_blob())
    }

    fn has_session(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async { self.read_blob().await.is_some() })
    }

    fn clear_session(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(self.remove_blob())
    }

    fn resolve_config_value<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(self.lookup_metadata(key))
    }
}
