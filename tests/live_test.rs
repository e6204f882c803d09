//! Live warehouse test.
//!
//! Skipped unless `SNOWFLAKE_*` environment variables describe a reachable
//! account. Asserts the property that matters end to end: the displayed
//! table equals the literal result of the fixed query.

use snowlet::config::ConnectionConfig;
use snowlet::page::{render_plain, PageState};
use snowlet::session::Session;
use snowlet::warehouse::{SqlApiClient, WarehouseClient, TABLES_QUERY};

/// Builds a connection from the environment, or None when not configured.
fn live_connection() -> Option<ConnectionConfig> {
    let mut connection = ConnectionConfig::default();
    connection.apply_env_defaults();
    connection.validate().ok()?;
    Some(connection)
}

#[tokio::test]
async fn test_fixed_query_result_is_displayed_verbatim() {
    let Some(connection) = live_connection() else {
        eprintln!("Skipping test: SNOWFLAKE_* not configured");
        return;
    };

    let session = Session::establish(&connection).unwrap();
    let client = SqlApiClient::new(session).unwrap();
    let dataframe = client.execute_query(TABLES_QUERY).await.unwrap();

    // INFORMATION_SCHEMA.TABLES always carries these columns.
    for expected in ["TABLE_CATALOG", "TABLE_SCHEMA", "TABLE_NAME", "TABLE_TYPE"] {
        assert!(
            dataframe.columns.iter().any(|c| c.name == expected),
            "missing column {expected}"
        );
    }

    assert_eq!(dataframe.row_count, dataframe.rows.len());
    for row in &dataframe.rows {
        assert_eq!(row.len(), dataframe.column_count());
    }

    // Every fetched row appears on the rendered page. Long names get an
    // ellipsis, so compare a prefix.
    let name_idx = dataframe
        .columns
        .iter()
        .position(|c| c.name == "TABLE_NAME")
        .unwrap();
    let state = PageState::new(dataframe.clone(), connection.display_string());
    let page = render_plain(&state, 500);
    for row in &dataframe.rows {
        let name = row[name_idx].to_display_string();
        let prefix = &name[..name.len().min(30)];
        assert!(page.contains(prefix), "row {name} not rendered");
    }
}
