//! Legacy session migration CLI
//!
//! Thin demo host for the migration library:
//! 1. Loads TOML config naming the session file, the credential manifest,
//!    and the exchange endpoint
//! 2. Composes the file store, the HTTP exchange client, and the migrator
//! 3. Runs one subcommand: status / migrate / clear / seed

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use legacy_auth::constants::{
    VENDOR_API_KEY_KEY, VENDOR_CONSUMER_KEY_KEY, VENDOR_CONSUMER_SECRET_KEY,
};
use legacy_auth::{FileSessionStore, RedeemablePayloadBuilder, SessionStore};
use migrator::AuthMigrator;
use provider::{HttpExchangeClient, NoActiveSession};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const USAGE: &str = "usage: migrate-cli [--config <path>] <status|migrate [--keep]|clear|seed <blob-file>>";

/// Parsed subcommand
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Report session presence and credential availability
    Status,
    /// Run a migration attempt; `keep` preserves the stored session
    Migrate { keep: bool },
    /// Delete the stored legacy session
    Clear,
    /// Write a session blob from a file into the store
    Seed { blob_file: PathBuf },
}

/// Parse CLI arguments into a config path override and a command.
fn parse_args(args: &[String]) -> Result<(Option<String>, Command), String> {
    let mut config_path = None;
    let mut rest = args.iter();

    let mut positional: Vec<&str> = Vec::new();
    let mut keep = false;
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => {
                let value = rest.next().ok_or("--config requires a path")?;
                config_path = Some(value.clone());
            }
            "--keep" => keep = true,
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        ["status"] => Command::Status,
        ["migrate"] => Command::Migrate { keep },
        ["clear"] => Command::Clear,
        ["seed", blob_file] => Command::Seed {
            blob_file: PathBuf::from(blob_file),
        },
        _ => return Err(USAGE.to_string()),
    };
    Ok((config_path, command))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (cli_config_path, command) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(usage) => {
            eprintln!("{usage}");
            std::process::exit(2);
        }
    };

    let config_path = Config::resolve_path(cli_config_path.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        session_file = %config.store.session_file.display(),
        manifest_file = %config.store.manifest_file.display(),
        endpoint = %config.exchange.endpoint,
        "configuration loaded"
    );

    let store = Arc::new(FileSessionStore::new(
        config.store.session_file.clone(),
        config.store.manifest_file.clone(),
    ));
    let exchange = Arc::new(HttpExchangeClient::new(
        reqwest::Client::new(),
        config.exchange.endpoint.clone(),
    ));
    let auth_migrator = AuthMigrator::new(store.clone(), exchange, Arc::new(NoActiveSession));

    match command {
        Command::Status => {
            let has_session = auth_migrator.has_legacy_auth().await;
            let consumer_key = store.resolve_config_value(VENDOR_CONSUMER_KEY_KEY).await;
            let consumer_secret = store
                .resolve_config_value(VENDOR_CONSUMER_SECRET_KEY)
                .await
                .map(common::Secret::new);
            let api_key = store.resolve_config_value(VENDOR_API_KEY_KEY).await;

            info!(
                has_legacy_session = has_session,
                consumer_key = consumer_key.as_deref().unwrap_or("<missing>"),
                consumer_secret = %consumer_secret
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "<missing>".into()),
                api_key = api_key.as_deref().unwrap_or("<missing>"),
                "legacy auth status"
            );
        }
        Command::Migrate { keep } => match auth_migrator.migrate(!keep).await {
            Ok(Some(user)) => {
                info!(user_id = %user.user_id, "migration succeeded");
            }
            Ok(None) => {
                info!("no redeemable legacy session, nothing migrated");
            }
            Err(e) => {
                error!(error = %e, "migration failed");
                std::process::exit(1);
            }
        },
        Command::Clear => {
            auth_migrator.clear_legacy_auth().await;
            info!("legacy session cleared");
        }
        Command::Seed { blob_file } => {
            let blob = std::fs::read_to_string(&blob_file)
                .with_context(|| format!("failed to read blob from {}", blob_file.display()))?;
            if let Err(e) = RedeemablePayloadBuilder::from_session_json(&blob) {
                // Seeding corrupt blobs is allowed — it exercises the
                // migrator's corrupt-session handling
                warn!(error = %e, "blob does not parse as a legacy session, seeding anyway");
            }
            store
                .set_session_blob(&blob)
                .await
                .context("failed to persist session blob")?;
            info!(path = %config.store.session_file.display(), "legacy session seeded");
        }
    }

    Ok(())
}
