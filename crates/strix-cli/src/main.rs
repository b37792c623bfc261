use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use strix_router::RouterBuilder;
use strix_server::{HttpServer, Registry, RegistryConfig, ServerConfig};
use tracing::info;

#[derive(clap::Parser)]
#[command(name = "strix", version, about = "strix http server")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    Serve(ServeArgs),
}

#[derive(clap::Args)]
#[command(about = "serve a directory over http")]
pub struct ServeArgs {
    /// ip:port
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: String,
    /// directory to serve
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
    /// Server header token
    #[arg(short, long, default_value = "strix")]
    server_name: String,
}

pub async fn serve(args: ServeArgs) -> Result<()> {
    let address = args.address.parse::<SocketAddr>()?;

    let registry = Registry::new(RegistryConfig::from_name(&args.server_name));
    let router = Arc::new(RouterBuilder::new().build());
    let server = HttpServer::open(
        registry,
        ServerConfig::from_addr(address),
        router,
        Some(args.root),
    )
    .await?;

    info!("Serving on http://{}", server.local_addr());

    tokio::signal::ctrl_c().await?;
    info!("Received ctrl-c, shutting down");
    server.close().await;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(subcommand) = cli.command {
        let result = match subcommand {
            Commands::Serve(args) => serve(args).await,
        };

        if let Err(e) = result {
            eprintln!("Application error: {:#}", e);
            std::process::exit(1);
        }
    }
}
