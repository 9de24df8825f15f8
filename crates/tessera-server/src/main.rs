//! Tessera Server — application entry point.

use tessera_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = DbConfig::from_env();
    let manager = DbManager::connect(&config).await?;
    manager.initialize().await?;

    tracing::info!("Tessera server ready.");

    // TODO: mount the admin HTTP surface once its API is settled.

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tessera=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Tessera server...");

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Tessera server failed to start");
        std::process::exit(1);
    }

    tracing::info!("Tessera server stopped.");
}
