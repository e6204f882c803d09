//! snowlet - a single-page Snowflake table viewer for the terminal.
//!
//! Establishes a warehouse session, runs one fixed query, and renders the
//! result as an interactive table. The library crate exposes the modules
//! for use in integration tests.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod page;
pub mod session;
pub mod warehouse;
