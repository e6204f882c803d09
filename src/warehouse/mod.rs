//! Warehouse abstraction for snowlet.
//!
//! Provides a trait-based interface for query execution so the REST client
//! and the canned mock can be used interchangeably.

mod decode;
mod mock;
mod sql_api;
mod types;

pub use mock::MockWarehouseClient;
pub use sql_api::SqlApiClient;
pub use types::{ColumnInfo, Dataframe, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// The one statement this program runs, displayed verbatim on the page.
pub const TABLES_QUERY: &str = "SELECT * FROM GIT_INT_DB.INFORMATION_SCHEMA.TABLES";

/// Trait defining the interface for warehouse clients.
///
/// All operations are async and return Results with SnowletError.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Executes a SQL statement and returns the fully materialized result.
    async fn execute_query(&self, sql: &str) -> Result<Dataframe>;
}
