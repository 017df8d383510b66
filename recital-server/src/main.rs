use anyhow::Result;
use recital_core::config::RecitalConfig;
use recital_server::{AppState, build_app, singleton};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 4096;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recital_server=info,tower_http=info")),
        )
        .init();

    let config = RecitalConfig::load()?;
    let data_dir = config.data_path();

    // Ensure only one instance writes to the data directory
    let _lock = singleton::acquire_lock(&data_dir)?;

    let state = AppState::new(&data_dir)?;
    let app = build_app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

    tracing::info!("Serving data from {}", data_dir.display());
    tracing::info!("recital-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
