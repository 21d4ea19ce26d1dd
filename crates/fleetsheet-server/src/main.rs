#![forbid(unsafe_code)]

use fleetsheet_app::app::ReconciliationService;
use fleetsheet_app::config::ServiceConfig;
use fleetsheet_server::{build_router, AppState};
use fleetsheet_types::Result;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<()> {
    let config = ServiceConfig::from_env()?;

    info!(auth = %config.auth_base_url, "acquiring fleet API token");
    let service = ReconciliationService::connect(&config).await?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "reconciliation service listening");

    axum::serve(listener, build_router(AppState::new(service))).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "reconciliation service stopped");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
