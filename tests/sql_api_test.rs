//! SQL API client tests against a mock HTTP server.
//!
//! Covers the documented behaviors of the statements endpoint: a completed
//! result, an error body, a rejected token, asynchronous execution (202
//! followed by polling), and multi-partition results.

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use snowlet::auth::{BearerToken, TokenType};
use snowlet::error::SnowletError;
use snowlet::session::Session;
use snowlet::warehouse::{SqlApiClient, Value, WarehouseClient, TABLES_QUERY};
use url::Url;

fn test_session(server: &MockServer) -> Session {
    Session {
        account: Some("testorg-test".to_string()),
        user: Some("TESTER".to_string()),
        base_url: Url::parse(&format!("{}/api/v2/", server.base_url())).unwrap(),
        token: BearerToken {
            token: "test-token".to_string(),
            token_type: TokenType::Oauth,
        },
        role: None,
        warehouse: Some("COMPUTE_WH".to_string()),
        database: None,
        schema: None,
    }
}

#[tokio::test]
async fn test_execute_query_decodes_result() -> Result<()> {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v2/statements")
            .header("Authorization", "Bearer test-token")
            .header("X-Snowflake-Authorization-Token-Type", "OAUTH")
            .json_body_partial(
                json!({
                    "statement": TABLES_QUERY,
                    "warehouse": "COMPUTE_WH"
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "statementHandle": "01b0-0000-0001",
            "resultSetMetaData": {
                "numRows": 2,
                "format": "jsonv2",
                "partitionInfo": [{"rowCount": 2}],
                "rowType": [
                    {"name": "TABLE_NAME", "type": "text"},
                    {"name": "ROW_COUNT", "type": "fixed", "scale": 0},
                    {"name": "CREATED", "type": "timestamp_ntz", "scale": 9}
                ]
            },
            "data": [
                ["ACCOUNTS", "42", "1672531200.000000000"],
                ["EVENTS", null, null]
            ],
            "code": "090001",
            "message": "Statement executed successfully."
        }));
    });

    let client = SqlApiClient::new(test_session(&server))?;
    let dataframe = client.execute_query(TABLES_QUERY).await?;

    mock.assert();
    assert_eq!(dataframe.column_count(), 3);
    assert_eq!(dataframe.columns[0].name, "TABLE_NAME");
    assert_eq!(dataframe.columns[1].data_type, "fixed");
    assert_eq!(dataframe.row_count, 2);
    assert_eq!(dataframe.rows[0][0], Value::String("ACCOUNTS".to_string()));
    assert_eq!(dataframe.rows[0][1], Value::Int(42));
    assert_eq!(
        dataframe.rows[0][2],
        Value::String("2023-01-01 00:00:00".to_string())
    );
    assert_eq!(dataframe.rows[1][1], Value::Null);
    Ok(())
}

#[tokio::test]
async fn test_sql_error_body_maps_to_query_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v2/statements");
        then.status(422).json_body(json!({
            "code": "002003",
            "message": "SQL compilation error:\nObject 'GIT_INT_DB' does not exist or not authorized.",
            "sqlState": "02000",
            "statementHandle": "01b0-0000-0002"
        }));
    });

    let client = SqlApiClient::new(test_session(&server))?;
    let err = client.execute_query(TABLES_QUERY).await.unwrap_err();

    assert!(matches!(err, SnowletError::Query(_)));
    let message = err.to_string();
    assert!(message.contains("002003"));
    assert!(message.contains("SQL compilation error"));
    assert!(message.contains("SQL state 02000"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_token_maps_to_auth_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v2/statements");
        then.status(401).json_body(json!({
            "code": "390303",
            "message": "Invalid OAuth access token."
        }));
    });

    let client = SqlApiClient::new(test_session(&server))?;
    let err = client.execute_query(TABLES_QUERY).await.unwrap_err();

    assert!(matches!(err, SnowletError::Auth(_)));
    assert!(err.to_string().contains("Invalid OAuth access token"));
    Ok(())
}

#[tokio::test]
async fn test_accepted_statement_is_polled_to_completion() -> Result<()> {
    let server = MockServer::start();

    let submit = server.mock(|when, then| {
        when.method(POST).path("/api/v2/statements");
        then.status(202).json_body(json!({
            "code": "333334",
            "message": "Asynchronous execution in progress.",
            "statementHandle": "01b0-0000-0003"
        }));
    });

    let poll = server.mock(|when, then| {
        when.method(GET).path("/api/v2/statements/01b0-0000-0003");
        then.status(200).json_body(json!({
            "statementHandle": "01b0-0000-0003",
            "resultSetMetaData": {
                "numRows": 1,
                "partitionInfo": [{"rowCount": 1}],
                "rowType": [{"name": "TABLE_NAME", "type": "text"}]
            },
            "data": [["ACCOUNTS"]]
        }));
    });

    let client = SqlApiClient::new(test_session(&server))?;
    let dataframe = client.execute_query(TABLES_QUERY).await?;

    submit.assert();
    poll.assert();
    assert_eq!(dataframe.row_count, 1);
    assert_eq!(dataframe.rows[0][0], Value::String("ACCOUNTS".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_multi_partition_result_is_fetched_in_order() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v2/statements");
        then.status(200).json_body(json!({
            "statementHandle": "01b0-0000-0004",
            "resultSetMetaData": {
                "numRows": 4,
                "partitionInfo": [{"rowCount": 2}, {"rowCount": 2}],
                "rowType": [{"name": "TABLE_NAME", "type": "text"}]
            },
            "data": [["A"], ["B"]]
        }));
    });

    let partition = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v2/statements/01b0-0000-0004")
            .query_param("partition", "1")
            .header("Authorization", "Bearer test-token");
        then.status(200).json_body(json!({
            "data": [["C"], ["D"]]
        }));
    });

    let client = SqlApiClient::new(test_session(&server))?;
    let dataframe = client.execute_query(TABLES_QUERY).await?;

    partition.assert();
    assert_eq!(dataframe.row_count, 4);
    let names: Vec<String> = dataframe
        .rows
        .iter()
        .map(|row| row[0].to_display_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C", "D"]);
    Ok(())
}

#[tokio::test]
async fn test_empty_result_keeps_columns() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v2/statements");
        then.status(200).json_body(json!({
            "statementHandle": "01b0-0000-0005",
            "resultSetMetaData": {
                "numRows": 0,
                "partitionInfo": [{"rowCount": 0}],
                "rowType": [
                    {"name": "TABLE_NAME", "type": "text"},
                    {"name": "ROW_COUNT", "type": "fixed", "scale": 0}
                ]
            },
            "data": []
        }));
    });

    let client = SqlApiClient::new(test_session(&server))?;
    let dataframe = client.execute_query(TABLES_QUERY).await?;

    assert!(dataframe.is_empty());
    assert_eq!(dataframe.column_count(), 2);
    Ok(())
}
