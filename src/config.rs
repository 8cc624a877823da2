use std::env;
use std::path::PathBuf;

use crate::storage::StoreKind;

/// Connection details for the remote multi-device store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub static_path: PathBuf,
    pub currency: String,
    pub locale: String,
    /// Set only when both URL and key are configured.
    pub remote: Option<RemoteConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, with `PENNYWISE_`-prefixed keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(&format!("PENNYWISE_{}", name));
        let non_empty = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let remote = match (non_empty("REMOTE_URL"), non_empty("REMOTE_KEY")) {
            (Some(url), Some(api_key)) => Some(RemoteConfig { url, api_key }),
            _ => None,
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(7070),
            database_path: var("DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|| PathBuf::from("data/pennywise.db")),
            migrations_path: var("MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("migrations")),
            static_path: var("STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            currency: non_empty("CURRENCY").unwrap_or_else(|| "USD".into()),
            locale: non_empty("LOCALE").unwrap_or_else(|| "en-US".into()),
            remote,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn storage_mode(&self) -> StoreKind {
        if self.remote.is_some() {
            StoreKind::Remote
        } else {
            StoreKind::Local
        }
    }
}
