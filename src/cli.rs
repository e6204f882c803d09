//! Command-line argument parsing for snowlet.
//!
//! The CLI only selects where the ambient session comes from; the page
//! itself takes no arguments.

use crate::config::{Authenticator, ConnectionConfig};
use crate::error::{Result, SnowletError};
use clap::Parser;
use std::path::PathBuf;

/// A single-page Snowflake table viewer for the terminal.
#[derive(Parser, Debug)]
#[command(name = "snowlet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Use named connection from connections.toml
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Account identifier (e.g. myorg-myaccount)
    #[arg(short = 'a', long, value_name = "ACCOUNT")]
    pub account: Option<String>,

    /// User name to authenticate as
    #[arg(short = 'u', long, value_name = "USER")]
    pub user: Option<String>,

    /// Role to assume for the session
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,

    /// Virtual warehouse to run the query on
    #[arg(short = 'w', long, value_name = "WAREHOUSE")]
    pub warehouse: Option<String>,

    /// Default database for the session context
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Default schema for the session context
    #[arg(long, value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Path to the RSA private key PEM for key-pair authentication
    #[arg(short = 'k', long, value_name = "PATH")]
    pub private_key: Option<PathBuf>,

    /// Authenticator: snowflake_jwt or oauth
    #[arg(long, value_name = "METHOD")]
    pub authenticator: Option<String>,

    /// Config file path (default: ~/.snowflake/connections.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Render the page once to stdout and exit (no terminal UI)
    #[arg(long)]
    pub plain: bool,

    /// Use a mock warehouse with canned data (for testing)
    #[arg(long)]
    pub mock: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Converts CLI arguments to a ConnectionConfig.
    ///
    /// Returns None when no connection-related argument was given, so the
    /// config file and environment can be consulted instead. An unknown
    /// --authenticator value is an error, not a silent default.
    pub fn to_connection_config(&self) -> Result<Option<ConnectionConfig>> {
        let has_any = self.account.is_some()
            || self.user.is_some()
            || self.role.is_some()
            || self.warehouse.is_some()
            || self.database.is_some()
            || self.schema.is_some()
            || self.private_key.is_some()
            || self.authenticator.is_some();

        if !has_any {
            return Ok(None);
        }

        let authenticator = match self.authenticator.as_deref() {
            Some(value) => Some(Authenticator::parse(value).ok_or_else(|| {
                SnowletError::config(format!(
                    "Unknown authenticator '{value}'. Expected 'snowflake_jwt' or 'oauth'."
                ))
            })?),
            None => None,
        };

        Ok(Some(ConnectionConfig {
            account: self.account.clone(),
            user: self.user.clone(),
            role: self.role.clone(),
            warehouse: self.warehouse.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
            private_key_path: self.private_key.clone(),
            authenticator,
            ..Default::default()
        }))
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the named connection to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }
}
