use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use platewire_config::{load_config, PlateWireConfig};
use platewire_gateway::server::{start_server, GatewayState};
use platewire_logging::init_logger;
use platewire_orders::{Fulfillment, OrderBook};
use platewire_store::{MenuItem, OrderStore, SqliteOrderStore};

#[derive(Parser)]
#[command(name = "platewire")]
#[command(about = "PlateWire — fulfillment backend for a conversational food-ordering assistant")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "platewire.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook fulfillment server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            let url = format!("http://localhost:{}/api/health", config.gateway.port);
            match client.get(&url).send().await {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("PlateWire is not running on port {}", config.gateway.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: PlateWireConfig) -> Result<()> {
    init_logger(&config.logging.dir, &config.logging.level);

    let db_path = config
        .database
        .path
        .clone()
        .unwrap_or_else(platewire_config::default_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data dir {}", parent.display()))?;
    }

    let store = SqliteOrderStore::open(&db_path)?;
    let menu: Vec<MenuItem> = config
        .menu
        .iter()
        .map(|entry| MenuItem {
            name: entry.name.clone(),
            price: entry.price,
        })
        .collect();
    store.seed_menu(&menu).await?;
    let store: Arc<dyn OrderStore> = Arc::new(store);

    let book = OrderBook::new(Duration::from_secs(config.sessions.idle_timeout_secs));
    let fulfillment = Arc::new(Fulfillment::new(
        book,
        store,
        Duration::from_secs(config.store.handoff_timeout_secs),
    ));

    spawn_cart_sweeper(
        fulfillment.clone(),
        Duration::from_secs(config.sessions.sweep_interval_secs),
    );

    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port)
        .parse()
        .context("Invalid gateway host/port")?;
    start_server(addr, GatewayState { fulfillment }).await
}

/// Periodically evict in-progress carts whose conversation went quiet.
fn spawn_cart_sweeper(fulfillment: Arc<Fulfillment>, sweep_interval: Duration) {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(sweep_interval);
        loop {
            timer.tick().await;
            let evicted = fulfillment.book().cleanup_expired().await;
            if evicted > 0 {
                info!("Evicted {} idle cart(s)", evicted);
            }
        }
    });
}
