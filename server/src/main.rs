use anyhow::Result;
use axum::Router;
use clap::Parser;
use lexcode_core::config::EngineConfig;
use lexcode_core::persist::invalidate_cache;
use lexcode_server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// CSV file path
    #[arg(long)]
    file: Option<PathBuf>,
    /// Index cache path
    #[arg(long)]
    index: Option<PathBuf>,
    /// Delete the cached index before starting
    #[arg(long, default_value_t = false)]
    retrain: bool,
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config = EngineConfig::from_env();
    if let Some(file) = args.file {
        config.dataset_path = file;
    }
    if let Some(index) = args.index {
        config.index_path = index;
    }
    if args.retrain {
        invalidate_cache(&config.index_path)?;
    }
    let app: Router = build_app(&config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
