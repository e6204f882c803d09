//! snowlet - a single-page Snowflake table viewer for the terminal.
//!
//! Control flow is linear: resolve the ambient credentials, establish a
//! session, run the one fixed query, render the page. Any failure
//! propagates here and exits with status 1.

use snowlet::cli::Cli;
use snowlet::config::Config;
use snowlet::error::Result;
use snowlet::page::{self, Page, PageState};
use snowlet::session::{resolve_connection, Session};
use snowlet::warehouse::{MockWarehouseClient, SqlApiClient, WarehouseClient, TABLES_QUERY};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    // In TUI mode the terminal belongs to the page, so logs go to a file.
    if cli.plain {
        snowlet::logging::init_stderr_logging();
    } else {
        snowlet::logging::init_file_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (client, connection_info): (Box<dyn WarehouseClient>, String) = if cli.mock {
        info!("Using mock warehouse");
        (Box::new(MockWarehouseClient::new()), "mock".to_string())
    } else {
        let config_path = cli.config_path();
        info!("Loading config from {}", config_path.display());
        let config = Config::load_from_file(&config_path)?;

        let connection = resolve_connection(&cli, &config)?;
        let session = Session::establish(&connection)?;
        let connection_info = session.display_string();

        (Box::new(SqlApiClient::new(session)?), connection_info)
    };

    let dataframe = client.execute_query(TABLES_QUERY).await?;
    info!(
        "Fetched {} rows, {} columns",
        dataframe.row_count,
        dataframe.column_count()
    );

    let mut state = PageState::new(dataframe, connection_info);

    if cli.plain {
        let width = crossterm::terminal::size()
            .map(|(w, _)| w as usize)
            .unwrap_or(120);
        print!("{}", page::render_plain(&state, width));
    } else {
        let mut page = Page::new()?;
        page.run(&mut state)?;
    }

    Ok(())
}
