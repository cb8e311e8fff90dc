//! Binary entrypoint for the emigraph HTTP server.
//!
//! Configuration comes from environment variables, see
//! [`ServerConfig`](emigraph_server::config::ServerConfig). `RUST_LOG`
//! controls the log filter (default: "info").

use emigraph_server::config::ServerConfig;
use emigraph_server::router::build_router;
use emigraph_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("emigraph server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
