use std::sync::Arc;

use searchbot::api::{AppState, create_router};
use searchbot::config::{CODE_VERSION, Config};
use searchbot::logging;
use searchbot::search_client::DiscoveryEngineClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(&config);
    tracing::info!(
        version = CODE_VERSION,
        environment = ?config.environment,
        project = %config.project_id,
        "starting search bot"
    );

    let search = DiscoveryEngineClient::new(&config).await?;
    let addr = config.socket_addr()?;
    let app = create_router(AppState::new(Arc::new(search), config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
