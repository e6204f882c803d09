//! Session establishment and ambient credential resolution.
//!
//! A [`Session`] is the authenticated handle to a warehouse account: the
//! resolved identity, a bearer token, the API base URL, and the optional
//! query context (role, warehouse, database, schema).

use crate::auth::{self, BearerToken};
use crate::cli::Cli;
use crate::config::{Config, ConnectionConfig};
use crate::error::{Result, SnowletError};
use tracing::{debug, info};
use url::Url;

/// An authenticated handle to a warehouse account.
#[derive(Debug, Clone)]
pub struct Session {
    /// Account identifier, when known.
    pub account: Option<String>,

    /// User the token was issued for, when known.
    pub user: Option<String>,

    /// Base URL of the SQL API (`https://<host>/api/v2/`).
    pub base_url: Url,

    /// Bearer token presented on every request.
    pub token: BearerToken,

    /// Role to assume, if any.
    pub role: Option<String>,

    /// Virtual warehouse to run statements on, if any.
    pub warehouse: Option<String>,

    /// Default database for the statement context, if any.
    pub database: Option<String>,

    /// Default schema for the statement context, if any.
    pub schema: Option<String>,
}

impl Session {
    /// Establishes a session from a resolved connection.
    ///
    /// Validates the connection, obtains a bearer token, and computes the
    /// API base URL. No network round-trip happens here; a bad credential
    /// surfaces on first use, the way `Session.builder.getOrCreate()` style
    /// APIs behave.
    pub fn establish(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let token = auth::acquire_token(config)?;
        let host = config.api_host()?;

        let base_url = Url::parse(&format!("https://{host}/api/v2/"))
            .map_err(|e| SnowletError::config(format!("Invalid API host '{host}': {e}")))?;

        info!("Session established for {}", config.display_string());

        Ok(Self {
            account: config.account.clone(),
            user: config.user.clone(),
            base_url,
            token,
            role: config.role.clone(),
            warehouse: config.warehouse.clone(),
            database: config.database.clone(),
            schema: config.schema.clone(),
        })
    }

    /// Returns a display-safe description of the session for the status line.
    pub fn display_string(&self) -> String {
        let user = self.user.as_deref().unwrap_or("?");
        let account = self
            .account
            .as_deref()
            .unwrap_or_else(|| self.base_url.host_str().unwrap_or("unknown"));

        match &self.database {
            Some(db) => format!("{user}@{account}/{db}"),
            None => format!("{user}@{account}"),
        }
    }
}

/// Resolves the ambient credential context into one connection.
///
/// Precedence, highest first: explicit CLI flags, the named connection from
/// the config file, the `default` connection, the platform-injected token
/// file, and finally `SNOWFLAKE_*` environment variables filling any gaps.
pub fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let mut connection = if let Some(name) = cli.connection_name() {
        config
            .get_connection(Some(name))
            .cloned()
            .ok_or_else(|| {
                SnowletError::config(format!("Connection '{name}' not found in config file"))
            })?
    } else if let Some(conn) = config.get_connection(None).cloned() {
        debug!("Using default connection from config file");
        conn
    } else if let Some(conn) = ConnectionConfig::from_platform() {
        debug!("Using platform-injected session token");
        conn
    } else {
        ConnectionConfig::default()
    };

    // CLI flags win over whatever the config file said.
    if let Some(cli_connection) = cli.to_connection_config()? {
        connection.merge(&cli_connection);
    }

    connection.apply_env_defaults();

    Ok(connection)
}
