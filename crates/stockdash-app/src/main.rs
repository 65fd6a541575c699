//! stockdash - quote gateway and terminal dashboard entry point.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockdash_app::{render_dashboard, AppConfig, AppError, AppResult};
use stockdash_core::Symbol;
use stockdash_dashboard::{Controller, FileStore, HttpQuoteGateway};
use tracing::info;

/// Single-symbol stock quote dashboard
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via STOCKDASH_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the quote gateway server
    Serve,
    /// Fetch a symbol through the gateway and print the dashboard
    Quote {
        /// Ticker symbol (e.g. IBM)
        symbol: Option<String>,
        /// Page URL whose `?symbol=` query selects the initial symbol
        #[arg(long, conflicts_with = "symbol")]
        page_url: Option<String>,
        /// Directory to write `<SYMBOL>_stock_data.csv` into
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Toggle a symbol in the favorites list
    Favorite {
        symbol: String,
    },
    /// Show the search history and favorites
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
}

type AppController = Controller<HttpQuoteGateway, FileStore>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > STOCKDASH_CONFIG env var > default
    let config_path = AppConfig::resolve_path(args.config);
    let config = AppConfig::load(&config_path)?;

    stockdash_telemetry::init_logging(config.log_level.as_deref())?;
    info!(config_path = %config_path, "Starting stockdash v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Serve => serve(config).await?,
        Command::Quote {
            symbol,
            page_url,
            csv_dir,
        } => quote(config, symbol, page_url, csv_dir).await?,
        Command::Favorite { symbol } => favorite(config, &symbol)?,
        Command::History { clear } => history(config, clear)?,
    }
    Ok(())
}

async fn serve(config: AppConfig) -> AppResult<()> {
    let gateway_config = config.gateway.with_api_key_from_env();
    info!(?gateway_config, "Gateway configuration loaded");

    stockdash_gateway::run_server(gateway_config)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;
    Ok(())
}

fn controller(config: AppConfig) -> AppResult<AppController> {
    let dashboard = config.dashboard;
    let gateway = HttpQuoteGateway::new(&dashboard.gateway_url, dashboard.request_timeout())?;
    let store = FileStore::open_in(&dashboard.data_dir)?;
    Ok(Controller::new(gateway, store, dashboard))
}

async fn quote(
    config: AppConfig,
    symbol: Option<String>,
    page_url: Option<String>,
    csv_dir: Option<PathBuf>,
) -> AppResult<()> {
    let controller = Arc::new(controller(config)?);

    let result = match page_url {
        Some(url) => match controller.start(&url) {
            Some(handle) => handle.await?,
            None => {
                return Err(AppError::InvalidArgument(format!(
                    "Page URL has no `symbol` query parameter: {url}"
                )))
            }
        },
        None => {
            controller.set_symbol(symbol.unwrap_or_default());
            controller.fetch().await
        }
    };

    print!(
        "{}",
        render_dashboard(&controller.snapshot(), std::io::stdout().is_terminal())
    );
    result?;

    if let Some(dir) = csv_dir {
        match controller.export_csv() {
            Some(export) => {
                std::fs::create_dir_all(&dir)?;
                let path = dir.join(&export.file_name);
                std::fs::write(&path, export.contents)?;
                println!("Saved {}", path.display());
            }
            None => info!("No series to export"),
        }
    }

    Ok(())
}

fn favorite(config: AppConfig, symbol: &str) -> AppResult<()> {
    let symbol = Symbol::new(symbol)?;
    let controller = controller(config)?;

    if controller.toggle_favorite(&symbol)? {
        println!("★ {symbol} added to favorites");
    } else {
        println!("☆ {symbol} removed from favorites");
    }
    Ok(())
}

fn history(config: AppConfig, clear: bool) -> AppResult<()> {
    let controller = controller(config)?;

    if clear {
        controller.clear_history()?;
        println!("Search history cleared");
    }

    let state = controller.snapshot();
    for symbol in state.history.symbols() {
        let star = if state.favorites.contains(symbol) { "★" } else { " " };
        println!("{star} {symbol}");
    }
    if state.history.is_empty() {
        println!("No recent searches");
    }
    Ok(())
}
