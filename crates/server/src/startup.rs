use common::utils::http::{build_cors, shutdown_signal};
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::{routes, state::AppState};

/// Public entry: load configuration, connect, and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_for_rest()?;
    let db = models::db::connect_with_retry(&cfg.database).await?;
    let app = routes::build_router(AppState::new(db), build_cors(&cfg.cors.allowed_origins));

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "REST server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("REST server stopped");
    Ok(())
}
