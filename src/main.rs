mod api;
mod config;
mod controller;
mod types;
mod view;
mod web;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{HttpApiClient, MarketApi};
use crate::config::{load_settings, Settings};
use crate::controller::DataViewController;
use crate::web::{render_page, start_dashboard_server, AppState};

#[derive(Parser)]
#[command(name = "market-dataview")]
#[command(version)]
#[command(about = "Portfolio and market-data dashboard over a JSON trading backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "dataview.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard
    Serve {
        /// Dashboard port (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Bootstrap once (and optionally load a symbol), then write the page
    Render {
        /// Symbol to load after the bootstrap
        #[arg(short, long)]
        symbol: Option<String>,
        /// Output HTML file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut settings = load_settings(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            run_server(settings).await?;
        }
        Commands::Render { symbol, output } => {
            render_once(settings, symbol.as_deref(), output.as_deref()).await?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn build_controller(settings: &Settings) -> Result<Arc<DataViewController>> {
    let client = HttpApiClient::new(&settings.api)?;
    info!("Using backend at {}", client.base_url());
    let api: Arc<dyn MarketApi> = Arc::new(client);
    Ok(Arc::new(DataViewController::new(api, settings)))
}

async fn run_server(settings: Settings) -> Result<()> {
    info!("Market DataView v{}", env!("CARGO_PKG_VERSION"));

    let controller = build_controller(&settings)?;
    let addr = settings.server.bind_addr();
    let state = AppState::new(controller, settings.page);

    info!("Dashboard available at http://{}", addr);
    start_dashboard_server(state, &addr).await
}

async fn render_once(settings: Settings, symbol: Option<&str>, output: Option<&str>) -> Result<()> {
    let controller = build_controller(&settings)?;

    let report = controller.bootstrap().await;
    for (panel, outcome) in &report.panels {
        if let Some(err) = outcome.error() {
            warn!("Rendering without {} panel: {}", panel, err);
        }
    }

    if let Some(symbol) = symbol.filter(|s| !s.is_empty()) {
        let load = controller.load_symbol(symbol).await;
        info!("Load finished for {}", load);
        if let Some(err) = load.overlay.error() {
            warn!("Chart rendered without signals: {}", err);
        }
    }

    let html = render_page(&controller.document().await, &settings.page)?;
    match output {
        Some(path) => {
            std::fs::write(path, html).with_context(|| format!("writing {}", path))?;
            info!("Dashboard written to {}", path);
        }
        None => print!("{}", html),
    }

    Ok(())
}
