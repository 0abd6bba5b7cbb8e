//! Mesa - CRM API server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mesa::{config::Args, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mesa={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Mesa CRM API v{}", env!("CARGO_PKG_VERSION"));
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Token expiry: {}s", args.jwt_expiry_seconds);
    info!("Max body: {} bytes", args.max_body_bytes);
    info!("Seed at startup: {}", !args.no_seed);
    info!("======================================");

    let state = Arc::new(server::AppState::new(args)?);

    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
