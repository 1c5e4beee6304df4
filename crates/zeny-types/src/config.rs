//! Service configuration types for Zeny.
//!
//! Two layers:
//! - [`Settings`]: tunables read from an optional `config.toml`. Every field has
//!   a default.
//! - [`ServiceConfig`]: the values the process cannot start without (store
//!   location, token signing secret, bootstrap admin). These never default.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum signing secret length in bytes (HMAC-SHA256 block of entropy).
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Longest accepted bearer token lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: u32 = 8760;

/// Tunables loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Bearer token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u32,
}

fn default_token_ttl_hours() -> u32 {
    24
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
}

/// Where the document store lives.
///
/// `url` is a `sqlite://<directory>` connection string and `namespace` names
/// the database inside it (`<directory>/<namespace>.db`).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub namespace: String,
}

impl StoreConfig {
    /// Directory holding the database file.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self
            .url
            .strip_prefix("sqlite://")
            .ok_or_else(|| ConfigError::Invalid {
                field: "store_url",
                reason: "must start with 'sqlite://'".to_string(),
            })?
            .trim_end_matches('/');
        if dir.is_empty() {
            return Err(ConfigError::Invalid {
                field: "store_url",
                reason: "must name a directory".to_string(),
            });
        }
        Ok(PathBuf::from(dir))
    }

    /// Full sqlx connection URL for the namespace database.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        let dir = self.data_dir()?;
        Ok(format!(
            "sqlite://{}?mode=rwc",
            dir.join(format!("{}.db", self.namespace)).display()
        ))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.data_dir()?;
        let valid_namespace = !self.namespace.is_empty()
            && self
                .namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_namespace {
            return Err(ConfigError::Invalid {
                field: "store_namespace",
                reason: "must be non-empty and contain only [A-Za-z0-9_-]".to_string(),
            });
        }
        Ok(())
    }
}

/// Credentials for the admin account created on first startup.
#[derive(Debug)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: SecretString,
}

/// Everything the service needs to start.
#[derive(Debug)]
pub struct ServiceConfig {
    pub store: StoreConfig,
    pub token_secret: SecretString,
    pub admin: BootstrapAdmin,
    pub settings: Settings,
}

impl ServiceConfig {
    /// Reject configurations that would start an insecure or broken service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;

        let secret = self.token_secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(ConfigError::Missing("token_secret"));
        }
        if secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                field: "token_secret",
                reason: format!("must be at least {MIN_TOKEN_SECRET_LEN} bytes"),
            });
        }

        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::Missing("admin_username"));
        }
        if self.admin.password.expose_secret().is_empty() {
            return Err(ConfigError::Missing("admin_password"));
        }

        let ttl = self.settings.auth.token_ttl_hours;
        if ttl == 0 || ttl > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Invalid {
                field: "auth.token_ttl_hours",
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}"),
            });
        }

        Ok(())
    }
}
