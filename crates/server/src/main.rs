use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use fxgate_core::{FrankfurterClient, Settings};
use fxgate_mcp::tools::{
    AvailableCurrenciesTool, ConvertCurrencyTool, HistoricalRatesTool, TimeSeriesRatesTool,
    TodayRatesTool, ToolRegistry,
};
use fxgate_mcp::McpServer;

mod auth;
mod http;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "fxgate")]
#[command(about = "Currency exchange rate tools over MCP", long_about = None)]
struct Args {
    /// Serve MCP over stdin/stdout instead of HTTP
    #[arg(long)]
    stdio: bool,

    /// Host to bind the HTTP transport to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP transport
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Configuration errors are fatal before any transport binds.
    let settings = Settings::from_env()?;
    logging::init(&settings, args.stdio)?;

    if settings.auth.is_some() {
        tracing::info!("GitHub authentication enabled");
    } else {
        tracing::info!("running without authentication");
    }

    let gateway = FrankfurterClient::new(&settings)?;

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AvailableCurrenciesTool::new(gateway.clone())));
    registry.register(Arc::new(ConvertCurrencyTool::new(gateway.clone())));
    registry.register(Arc::new(TodayRatesTool::new(gateway.clone())));
    registry.register(Arc::new(HistoricalRatesTool::new(gateway.clone())));
    registry.register(Arc::new(TimeSeriesRatesTool::new(gateway)));
    tracing::info!(tools = registry.list_schemas().len(), "registered rate tools");

    let server = McpServer::new(registry);
    if args.stdio {
        server.run_stdio().await
    } else {
        let addr = format!("{}:{}", args.host, args.port);
        http::serve(&addr, server, settings.auth).await
    }
}
