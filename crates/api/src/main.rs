use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod app;
mod config;
mod error;
mod middleware;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Grafana Adapter v{}", env!("CARGO_PKG_VERSION"));

    // Install the Prometheus recorder before any request is served
    middleware::init_metrics();

    // Upstream Grafana client
    let admin = grafana::BasicAuth::new(&config.grafana.login, &config.grafana.password);
    let client = grafana::GrafanaClient::new(
        config.grafana_url(),
        admin,
        config.grafana_timeout(),
    )?;
    info!("Upstream Grafana at {}", config.grafana_url());

    // Build application
    let app = app::create_app(config.clone(), Arc::new(client));

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
