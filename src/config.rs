//! Configuration management for snowlet.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with support for named warehouse connections in the style of Snowflake's
//! `connections.toml`.

use crate::error::{Result, SnowletError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Token file injected by Snowflake-hosted runtimes (e.g. container services).
pub const PLATFORM_TOKEN_PATH: &str = "/snowflake/session/token";

/// Main configuration structure for snowlet.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named warehouse connections.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

/// How a bearer token for the SQL API is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authenticator {
    /// Key-pair authentication: sign a JWT with a local RSA private key.
    #[default]
    SnowflakeJwt,
    /// An externally issued OAuth token, inline or read from a file.
    Oauth,
}

impl Authenticator {
    /// Returns the authenticator as a string for display purposes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SnowflakeJwt => "snowflake_jwt",
            Self::Oauth => "oauth",
        }
    }

    /// Parses an authenticator from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snowflake_jwt" | "keypair" => Some(Self::SnowflakeJwt),
            "oauth" => Some(Self::Oauth),
            _ => None,
        }
    }
}

/// Warehouse connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectionConfig {
    /// Account identifier (e.g. `myorg-myaccount` or a legacy locator).
    pub account: Option<String>,

    /// User name to authenticate as.
    pub user: Option<String>,

    /// Explicit API host. Derived from the account when absent.
    pub host: Option<String>,

    /// Role to assume for the session.
    pub role: Option<String>,

    /// Virtual warehouse to run the query on.
    pub warehouse: Option<String>,

    /// Default database for the session context.
    pub database: Option<String>,

    /// Default schema for the session context.
    pub schema: Option<String>,

    /// Token acquisition method. Key-pair authentication when unset.
    pub authenticator: Option<Authenticator>,

    /// Path to the RSA private key PEM (key-pair authentication).
    pub private_key_path: Option<PathBuf>,

    /// Inline OAuth token (not recommended to store in config).
    pub token: Option<String>,

    /// Path to a file containing an OAuth token.
    pub token_path: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Builds a connection from the ambient context a Snowflake-hosted
    /// runtime injects: a token file plus `SNOWFLAKE_HOST`.
    pub fn from_platform() -> Option<Self> {
        let token_path = PathBuf::from(PLATFORM_TOKEN_PATH);
        if !token_path.exists() {
            return None;
        }
        let host = std::env::var("SNOWFLAKE_HOST").ok()?;

        Some(Self {
            host: Some(host),
            account: std::env::var("SNOWFLAKE_ACCOUNT").ok(),
            user: std::env::var("SNOWFLAKE_USER").ok(),
            authenticator: Some(Authenticator::Oauth),
            token_path: Some(token_path),
            ..Default::default()
        })
    }

    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &ConnectionConfig) {
        if other.account.is_some() {
            self.account = other.account.clone();
        }
        if other.user.is_some() {
            self.user = other.user.clone();
        }
        if other.host.is_some() {
            self.host = other.host.clone();
        }
        if other.role.is_some() {
            self.role = other.role.clone();
        }
        if other.warehouse.is_some() {
            self.warehouse = other.warehouse.clone();
        }
        if other.database.is_some() {
            self.database = other.database.clone();
        }
        if other.schema.is_some() {
            self.schema = other.schema.clone();
        }
        if other.authenticator.is_some() {
            self.authenticator = other.authenticator;
        }
        if other.private_key_path.is_some() {
            self.private_key_path = other.private_key_path.clone();
        }
        if other.token.is_some() {
            self.token = other.token.clone();
        }
        if other.token_path.is_some() {
            self.token_path = other.token_path.clone();
        }
    }

    /// Applies `SNOWFLAKE_*` environment variables as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.account.is_none() {
            self.account = std::env::var("SNOWFLAKE_ACCOUNT").ok();
        }
        if self.user.is_none() {
            self.user = std::env::var("SNOWFLAKE_USER").ok();
        }
        if self.host.is_none() {
            self.host = std::env::var("SNOWFLAKE_HOST").ok();
        }
        if self.role.is_none() {
            self.role = std::env::var("SNOWFLAKE_ROLE").ok();
        }
        if self.warehouse.is_none() {
            self.warehouse = std::env::var("SNOWFLAKE_WAREHOUSE").ok();
        }
        if self.database.is_none() {
            self.database = std::env::var("SNOWFLAKE_DATABASE").ok();
        }
        if self.schema.is_none() {
            self.schema = std::env::var("SNOWFLAKE_SCHEMA").ok();
        }
        if self.authenticator.is_none() {
            self.authenticator = std::env::var("SNOWFLAKE_AUTHENTICATOR")
                .ok()
                .and_then(|auth| Authenticator::parse(&auth));
        }
        if self.private_key_path.is_none() {
            self.private_key_path = std::env::var("SNOWFLAKE_PRIVATE_KEY_PATH")
                .ok()
                .map(PathBuf::from);
        }
        if self.token.is_none() {
            self.token = std::env::var("SNOWFLAKE_TOKEN").ok();
        }
        if self.token_path.is_none() {
            self.token_path = std::env::var("SNOWFLAKE_TOKEN_PATH").ok().map(PathBuf::from);
        }
    }

    /// Returns the API host, derived from the account when not explicit.
    ///
    /// Underscores in account identifiers are not valid in hostnames and
    /// are replaced with hyphens.
    pub fn api_host(&self) -> Result<String> {
        if let Some(host) = &self.host {
            return Ok(host.clone());
        }

        let account = self.account.as_deref().ok_or_else(|| {
            SnowletError::config("An account identifier (or explicit host) is required")
        })?;

        Ok(format!(
            "{}.snowflakecomputing.com",
            account.to_lowercase().replace('_', "-")
        ))
    }

    /// Checks that the fields required by the configured authenticator are present.
    pub fn validate(&self) -> Result<()> {
        if self.account.is_none() && self.host.is_none() {
            return Err(SnowletError::config(
                "No account configured. Set 'account' in connections.toml or SNOWFLAKE_ACCOUNT.",
            ));
        }

        match self.authenticator.unwrap_or_default() {
            Authenticator::SnowflakeJwt => {
                if self.user.is_none() {
                    return Err(SnowletError::config(
                        "Key-pair authentication requires 'user'",
                    ));
                }
                if self.account.is_none() {
                    return Err(SnowletError::config(
                        "Key-pair authentication requires 'account'",
                    ));
                }
                if self.private_key_path.is_none() {
                    return Err(SnowletError::config(
                        "Key-pair authentication requires 'private_key_path'",
                    ));
                }
            }
            Authenticator::Oauth => {
                if self.token.is_none() && self.token_path.is_none() {
                    return Err(SnowletError::config(
                        "OAuth authentication requires 'token' or 'token_path'",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns a display-safe string (no secrets) for UI purposes.
    pub fn display_string(&self) -> String {
        let user = self.user.as_deref().unwrap_or("?");
        let account = self
            .account
            .as_deref()
            .or(self.host.as_deref())
            .unwrap_or("unknown");

        match &self.database {
            Some(db) => format!("{user}@{account}/{db}"),
            None => format!("{user}@{account}"),
        }
    }
}

impl Config {
    /// Returns the default config file path.
    ///
    /// Honors `$SNOWFLAKE_HOME` when set, otherwise uses the conventional
    /// `~/.snowflake/connections.toml`.
    pub fn default_path() -> PathBuf {
        if let Ok(home) = std::env::var("SNOWFLAKE_HOME") {
            return PathBuf::from(home).join("connections.toml");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".snowflake")
            .join("connections.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file is not an error; ambient environment variables may
    /// still provide a complete connection.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SnowletError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SnowletError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named connection, or the default connection if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionConfig> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }
}
