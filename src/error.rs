//! Error types for snowlet.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for snowlet operations.
#[derive(Error, Debug)]
pub enum SnowletError {
    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication errors (unreadable key, rejected token, etc.)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Query execution errors (SQL compilation errors, warehouse failures, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Rendering errors (terminal setup, draw failures, etc.)
    #[error("Render error: {0}")]
    Render(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SnowletError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an authentication error with the given message.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a rendering error with the given message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Auth(_) => "Authentication Error",
            Self::Query(_) => "Query Error",
            Self::Render(_) => "Render Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using SnowletError.
pub type Result<T> = std::result::Result<T, SnowletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = SnowletError::config("missing field 'account' in connections.default");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing field 'account' in connections.default"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_auth() {
        let err = SnowletError::auth("JWT token is invalid");
        assert_eq!(err.to_string(), "Authentication error: JWT token is invalid");
        assert_eq!(err.category(), "Authentication Error");
    }

    #[test]
    fn test_error_display_query() {
        let err = SnowletError::query("SQL compilation error: object does not exist");
        assert_eq!(
            err.to_string(),
            "Query error: SQL compilation error: object does not exist"
        );
        assert_eq!(err.category(), "Query Error");
    }

    #[test]
    fn test_error_display_render() {
        let err = SnowletError::render("failed to enter alternate screen");
        assert_eq!(
            err.to_string(),
            "Render error: failed to enter alternate screen"
        );
        assert_eq!(err.category(), "Render Error");
    }

    #[test]
    fn test_error_display_internal() {
        let err = SnowletError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.category(), "Internal Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SnowletError>();
    }
}
