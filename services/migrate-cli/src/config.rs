//! Configuration types and loading
//!
//! Config precedence: CLI `--config` > CONFIG_PATH env var > default path.
//! The app credentials themselves never appear here — they live in the
//! manifest file the session store resolves them from.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub exchange: ExchangeConfig,
}

/// Where the legacy session and the credential manifest live
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub session_file: PathBuf,
    pub manifest_file: PathBuf,
}

/// Exchange endpoint settings
#[derive(Debug, Deserialize)]
pub struct ExchangeConfig {
    pub endpoint: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        if !config.exchange.endpoint.starts_with("http://")
            && !config.exchange.endpoint.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "exchange endpoint must start with http:// or https://, got: {}",
                config.exchange.endpoint
            )));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("migrate-cli.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch CONFIG_PATH so parallel runs don't race.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn valid_toml() -> &'static str {
        r#"
[store]
session_file = "/var/lib/legacy/session.json"
manifest_file = "/etc/legacy/manifest.toml"

[exchange]
endpoint = "https://identity.example.com/v1/token:exchange"
"#
    }

    #[test]
    fn loads_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.store.session_file,
            PathBuf::from("/var/lib/legacy/session.json")
        );
        assert_eq!(
            config.exchange.endpoint,
            "https://identity.example.com/v1/token:exchange"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Path::new("/nonexistent/config.toml")).is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{{{ toml").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn endpoint_without_scheme_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[store]
session_file = "/tmp/session.json"
manifest_file = "/tmp/manifest.toml"

[exchange]
endpoint = "identity.example.com/v1/token:exchange"
"#,
        )
        .unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(
            err.to_string().contains("must start with http"),
            "got: {err}"
        );
    }

    #[test]
    fn resolve_path_prefers_cli_arg() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { std::env::set_var("CONFIG_PATH", "/env/should-lose.toml") };
        let path = Config::resolve_path(Some("/cli/wins.toml"));
        assert_eq!(path, PathBuf::from("/cli/wins.toml"));
        unsafe { std::env::remove_var("CONFIG_PATH") };
    }

    #[test]
    fn resolve_path_falls_back_to_env_then_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { std::env::set_var("CONFIG_PATH", "/env/path.toml") };
        assert_eq!(Config::resolve_path(None), PathBuf::from("/env/path.toml"));
        unsafe { std::env::remove_var("CONFIG_PATH") };
        assert_eq!(Config::resolve_path(None), PathBuf::from("migrate-cli.toml"));
    }
}
