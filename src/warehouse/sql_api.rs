//! Snowflake SQL REST API client.
//!
//! Implements [`WarehouseClient`] over the `/api/v2/statements` endpoint:
//! submit the statement, poll while the server reports it in progress, fetch
//! every result partition, and decode the rows into a [`Dataframe`].

use super::decode::decode_value;
use super::types::{ColumnInfo, Dataframe, Row};
use super::WarehouseClient;
use crate::error::{Result, SnowletError};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

/// Header announcing how the bearer token was obtained.
const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";

/// Server-side statement timeout, in seconds.
const STATEMENT_TIMEOUT_SECS: u64 = 300;

/// Delay between polls of an in-progress statement.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Warehouse client backed by the Snowflake SQL REST API.
pub struct SqlApiClient {
    http: Client,
    session: Session,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a str>,
}

/// Response body of the statements endpoint.
///
/// The same shape covers a completed result set, an in-progress status, and
/// an error body, so every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatementResponse {
    statement_handle: Option<String>,
    result_set_meta_data: Option<ResultSetMetaData>,
    data: Option<Vec<RawRow>>,
    code: Option<String>,
    message: Option<String>,
    sql_state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResultSetMetaData {
    num_rows: u64,
    partition_info: Vec<PartitionInfo>,
    row_type: Vec<RowType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PartitionInfo {
    row_count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct RowType {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
    scale: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct PartitionResponse {
    data: Vec<RawRow>,
}

/// Every cell arrives as a JSON string or null.
type RawRow = Vec<Option<String>>;

impl SqlApiClient {
    /// Creates a client for the given session.
    pub fn new(session: Session) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("snowlet/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(STATEMENT_TIMEOUT_SECS + 30))
            .build()
            .map_err(|e| SnowletError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, session })
    }

    fn statements_url(&self) -> Result<Url> {
        self.session
            .base_url
            .join("statements")
            .map_err(|e| SnowletError::internal(format!("Invalid API base URL: {e}")))
    }

    fn statement_url(&self, handle: &str) -> Result<Url> {
        self.session
            .base_url
            .join(&format!("statements/{handle}"))
            .map_err(|e| SnowletError::internal(format!("Invalid statement handle: {e}")))
    }

    /// Attaches the bearer token and token-type header.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.session.token.token)
            .header(TOKEN_TYPE_HEADER, self.session.token.token_type.header_value())
    }

    /// Follows HTTP 202 responses until the statement completes.
    ///
    /// This is the documented asynchronous-execution contract of the SQL
    /// API, not a retry: a failed statement still fails.
    async fn await_completion(&self, mut response: Response) -> Result<Response> {
        loop {
            match response.status() {
                StatusCode::OK => return Ok(response),
                StatusCode::ACCEPTED => {
                    let status: StatementResponse = response
                        .json()
                        .await
                        .map_err(|e| SnowletError::query(format!("Malformed API response: {e}")))?;
                    let handle = status.statement_handle.ok_or_else(|| {
                        SnowletError::query("Statement accepted without a statement handle")
                    })?;

                    debug!("Statement {handle} still running, polling");
                    tokio::time::sleep(POLL_INTERVAL).await;

                    response = self
                        .authorized(self.http.get(self.statement_url(&handle)?))
                        .send()
                        .await
                        .map_err(|e| {
                            SnowletError::query(format!("Failed to poll statement status: {e}"))
                        })?;
                }
                _ => return Err(self.error_from_response(response).await),
            }
        }
    }

    /// Maps a non-success response to an error category without rewriting
    /// what the server said.
    async fn error_from_response(&self, response: Response) -> SnowletError {
        let status = response.status();
        let body: StatementResponse = response.json().await.unwrap_or_default();

        let detail = match (body.code, body.message) {
            (Some(code), Some(message)) => {
                let sql_state = body
                    .sql_state
                    .map(|s| format!(" (SQL state {s})"))
                    .unwrap_or_default();
                format!("{code}: {message}{sql_state}")
            }
            _ => format!("SQL API returned HTTP {status}"),
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            SnowletError::auth(detail)
        } else {
            SnowletError::query(detail)
        }
    }

    /// Fetches the remaining partitions and decodes everything into a dataframe.
    async fn collect_result(&self, result: StatementResponse, start: Instant) -> Result<Dataframe> {
        let meta = result.result_set_meta_data.ok_or_else(|| {
            SnowletError::query("SQL API response carried no result set metadata")
        })?;

        let columns: Vec<ColumnInfo> = meta
            .row_type
            .iter()
            .map(|col| ColumnInfo::new(&col.name, &col.data_type))
            .collect();

        // Partition 0 arrives inline with the response; the rest are
        // fetched one by one, in order.
        let mut raw_rows = result.data.unwrap_or_default();
        if meta.partition_info.len() > 1 {
            let handle = result.statement_handle.as_deref().ok_or_else(|| {
                SnowletError::query("Multi-partition result without a statement handle")
            })?;

            for partition in 1..meta.partition_info.len() {
                debug!(
                    "Fetching partition {partition} ({} rows) of statement {handle}",
                    meta.partition_info[partition].row_count
                );

                let response = self
                    .authorized(self.http.get(self.statement_url(handle)?))
                    .query(&[("partition", partition.to_string())])
                    .send()
                    .await
                    .map_err(|e| {
                        SnowletError::query(format!("Failed to fetch partition {partition}: {e}"))
                    })?;

                if !response.status().is_success() {
                    return Err(self.error_from_response(response).await);
                }

                let part: PartitionResponse = response
                    .json()
                    .await
                    .map_err(|e| SnowletError::query(format!("Malformed partition body: {e}")))?;
                raw_rows.extend(part.data);
            }
        }

        let rows: Vec<Row> = raw_rows
            .iter()
            .map(|raw| {
                meta.row_type
                    .iter()
                    .zip(raw)
                    .map(|(col, cell)| decode_value(cell.as_deref(), &col.data_type, col.scale))
                    .collect()
            })
            .collect();

        let elapsed = start.elapsed();
        info!(
            "Query returned {} of {} rows in {:?}",
            rows.len(),
            meta.num_rows,
            elapsed
        );

        Ok(Dataframe::with_data(columns, rows).with_execution_time(elapsed))
    }
}

#[async_trait]
impl WarehouseClient for SqlApiClient {
    async fn execute_query(&self, sql: &str) -> Result<Dataframe> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();
        info!("Submitting statement (requestId {request_id})");

        let body = StatementRequest {
            statement: sql,
            timeout: STATEMENT_TIMEOUT_SECS,
            role: self.session.role.as_deref(),
            warehouse: self.session.warehouse.as_deref(),
            database: self.session.database.as_deref(),
            schema: self.session.schema.as_deref(),
        };

        let response = self
            .authorized(self.http.post(self.statements_url()?))
            .query(&[("requestId", request_id.to_string())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SnowletError::query(format!("Failed to reach the SQL API: {e}")))?;

        let response = self.await_completion(response).await?;

        let result: StatementResponse = response
            .json()
            .await
            .map_err(|e| SnowletError::query(format!("Malformed API response: {e}")))?;

        self.collect_result(result, start).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_result_set() {
        let body = r#"{
            "resultSetMetaData": {
                "numRows": 1,
                "format": "jsonv2",
                "partitionInfo": [{"rowCount": 1, "uncompressedSize": 100}],
                "rowType": [
                    {"name": "TABLE_NAME", "type": "text", "nullable": false},
                    {"name": "ROW_COUNT", "type": "fixed", "scale": 0}
                ]
            },
            "data": [["ACCOUNTS", "42"]],
            "code": "090001",
            "statementHandle": "01b0-0000",
            "message": "Statement executed successfully."
        }"#;

        let parsed: StatementResponse = serde_json::from_str(body).unwrap();
        let meta = parsed.result_set_meta_data.unwrap();

        assert_eq!(meta.num_rows, 1);
        assert_eq!(meta.partition_info.len(), 1);
        assert_eq!(meta.row_type[0].name, "TABLE_NAME");
        assert_eq!(meta.row_type[1].data_type, "fixed");
        assert_eq!(meta.row_type[1].scale, Some(0));
        assert_eq!(parsed.data.unwrap()[0][1], Some("42".to_string()));
    }

    #[test]
    fn test_deserialize_error_body() {
        let body = r#"{
            "code": "002003",
            "message": "SQL compilation error: Object does not exist",
            "sqlState": "02000",
            "statementHandle": "01b0-0001"
        }"#;

        let parsed: StatementResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, Some("002003".to_string()));
        assert_eq!(parsed.sql_state, Some("02000".to_string()));
        assert!(parsed.result_set_meta_data.is_none());
    }

    #[test]
    fn test_serialize_statement_request_skips_empty_context() {
        let request = StatementRequest {
            statement: "SELECT 1",
            timeout: 300,
            role: None,
            warehouse: Some("COMPUTE_WH"),
            database: None,
            schema: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""warehouse":"COMPUTE_WH""#));
        assert!(!json.contains("role"));
        assert!(!json.contains("database"));
    }
}
