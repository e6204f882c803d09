//! Mock warehouse client for testing.
//!
//! Returns a canned table catalog shaped like the real
//! `INFORMATION_SCHEMA.TABLES` result, so the page can be exercised without
//! a warehouse.

use super::types::{ColumnInfo, Dataframe, Value};
use super::WarehouseClient;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A warehouse client that answers every statement with canned data.
pub struct MockWarehouseClient {
    dataframe: Dataframe,
}

impl MockWarehouseClient {
    /// Creates a mock client with the canned table catalog.
    pub fn new() -> Self {
        Self {
            dataframe: catalog_dataframe(),
        }
    }

    /// Creates a mock client that returns the given dataframe.
    pub fn with_dataframe(dataframe: Dataframe) -> Self {
        Self { dataframe }
    }
}

impl Default for MockWarehouseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WarehouseClient for MockWarehouseClient {
    async fn execute_query(&self, sql: &str) -> Result<Dataframe> {
        debug!("Mock warehouse serving canned result for: {sql}");
        Ok(self.dataframe.clone())
    }
}

/// A few catalog rows in the shape `INFORMATION_SCHEMA.TABLES` returns.
fn catalog_dataframe() -> Dataframe {
    let columns = vec![
        ColumnInfo::new("TABLE_CATALOG", "text"),
        ColumnInfo::new("TABLE_SCHEMA", "text"),
        ColumnInfo::new("TABLE_NAME", "text"),
        ColumnInfo::new("TABLE_TYPE", "text"),
        ColumnInfo::new("ROW_COUNT", "fixed"),
        ColumnInfo::new("BYTES", "fixed"),
        ColumnInfo::new("CREATED", "timestamp_ltz"),
    ];

    let rows = vec![
        vec![
            Value::String("GIT_INT_DB".to_string()),
            Value::String("CODE_SCHEMA".to_string()),
            Value::String("ACCOUNTS".to_string()),
            Value::String("BASE TABLE".to_string()),
            Value::Int(42),
            Value::Int(16_384),
            Value::String("2023-01-01 09:15:00".to_string()),
        ],
        vec![
            Value::String("GIT_INT_DB".to_string()),
            Value::String("CODE_SCHEMA".to_string()),
            Value::String("ACCOUNTS_VIEW".to_string()),
            Value::String("VIEW".to_string()),
            Value::Null,
            Value::Null,
            Value::String("2023-01-01 09:16:30".to_string()),
        ],
        vec![
            Value::String("GIT_INT_DB".to_string()),
            Value::String("INFORMATION_SCHEMA".to_string()),
            Value::String("TABLES".to_string()),
            Value::String("VIEW".to_string()),
            Value::Null,
            Value::Null,
            Value::String("2023-01-01 00:00:00".to_string()),
        ],
        vec![
            Value::String("GIT_INT_DB".to_string()),
            Value::String("EVENTS".to_string()),
            Value::String("PAGE_VIEWS".to_string()),
            Value::String("BASE TABLE".to_string()),
            Value::Int(1_048_576),
            Value::Int(73_400_320),
            Value::String("2023-03-14 15:09:26".to_string()),
        ],
    ];

    Dataframe::with_data(columns, rows).with_execution_time(Duration::from_millis(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::TABLES_QUERY;

    #[tokio::test]
    async fn test_mock_returns_catalog() {
        let client = MockWarehouseClient::new();
        let result = client.execute_query(TABLES_QUERY).await.unwrap();

        assert_eq!(result.column_count(), 7);
        assert_eq!(result.row_count, 4);
        assert_eq!(result.columns[2].name, "TABLE_NAME");
        // Views report NULL row counts.
        assert_eq!(result.rows[1][4], Value::Null);
    }

    #[tokio::test]
    async fn test_mock_with_custom_dataframe() {
        let dataframe = Dataframe::with_data(
            vec![ColumnInfo::new("N", "fixed")],
            vec![vec![Value::Int(1)]],
        );
        let client = MockWarehouseClient::with_dataframe(dataframe);

        let result = client.execute_query("SELECT 1").await.unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.rows[0][0], Value::Int(1));
    }
}
