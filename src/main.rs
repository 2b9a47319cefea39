use std::error::Error;

use clap::Parser;
use mapserve::app::App;
use mapserve::cli::Args;
use mapserve::config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from(Args::parse());
    let app = App::from_config(config).bind().await?;

    info!("Server running at http://localhost:{}", app.local_addr().port());
    info!("Press Ctrl+C to stop.");

    app.run_until(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    Ok(())
}
