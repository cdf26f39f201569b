use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use civicquest::config::{Cli, Config};
use civicquest::routes;
use civicquest::state::AppState;
use civicquest::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    // All records live in memory for the lifetime of the process
    let state = AppState::new(Store::new(), config.clone());
    let app = routes::app(state);

    let addr: SocketAddr = config.bind_addr().parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
